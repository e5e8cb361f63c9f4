use async_trait::async_trait;

use crate::error::AppError;

/// One request to a text-generation backend
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub system_prompt: Option<String>,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Ask the backend for a JSON object instead of free text
    pub json_response: bool,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: None,
            prompt: prompt.into(),
            temperature: 0.7,
            max_tokens: 300,
            json_response: false,
        }
    }

    pub fn with_system(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn json(mut self) -> Self {
        self.json_response = true;
        self
    }
}

/// Defines the interface for a text-generation backend.
///
/// The coach collaborators receive an implementation at construction, so a
/// remote API, a mock or the offline generator can be used interchangeably.
#[async_trait]
pub trait TextGenerator: Send + Sync + 'static {
    /// Generates a complete response for the request.
    async fn generate(&self, request: GenerationRequest) -> Result<String, AppError>;
}

/// Generator used when no API key is configured.
///
/// Every call fails, so each collaborator falls back to its fixed text.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineGenerator;

#[async_trait]
impl TextGenerator for OfflineGenerator {
    async fn generate(&self, _request: GenerationRequest) -> Result<String, AppError> {
        Err(AppError::Config(
            "no text-generation backend configured (set OPENAI_API_KEY)".to_string(),
        ))
    }
}
