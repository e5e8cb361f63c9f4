use async_trait::async_trait;
use reqwest::header::{HeaderMap, AUTHORIZATION};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{error, info};

use super::traits::{GenerationRequest, TextGenerator};
use crate::config::CoachConfig;
use crate::error::AppError;

/// Client for an OpenAI-compatible `chat/completions` endpoint
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    request_timeout: Duration,
}

impl OpenAiClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            request_timeout,
        }
    }

    /// Returns `None` when the configuration carries no API key
    pub fn from_config(config: &CoachConfig) -> Option<Self> {
        config.api_key.as_ref().map(|key| {
            Self::new(
                config.base_url.clone(),
                key.clone(),
                config.model.clone(),
                config.request_timeout,
            )
        })
    }

    fn build_payload(&self, request: &GenerationRequest) -> Value {
        let mut messages = Vec::new();
        if let Some(system) = &request.system_prompt {
            messages.push(json!({ "role": "system", "content": system }));
        }
        messages.push(json!({ "role": "user", "content": request.prompt }));

        let mut payload = json!({
            "model": self.model,
            "messages": messages,
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
        });

        if request.json_response {
            payload["response_format"] = json!({ "type": "json_object" });
        }
        payload
    }

    fn build_request(&self, payload: &Value) -> Result<reqwest::RequestBuilder, AppError> {
        let mut headers = HeaderMap::new();
        let auth_value = format!("Bearer {}", self.api_key)
            .parse()
            .map_err(|_| AppError::Config("API key is not a valid header value".to_string()))?;
        headers.insert(AUTHORIZATION, auth_value);

        Ok(self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .headers(headers)
            .json(payload))
    }
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    async fn generate(&self, request: GenerationRequest) -> Result<String, AppError> {
        info!(
            "Requesting completion from {} (max_tokens: {}, json: {})",
            self.model, request.max_tokens, request.json_response
        );

        let payload = self.build_payload(&request);
        let request_future = self.build_request(&payload)?.send();

        let res = timeout(self.request_timeout, request_future).await??;
        let status = res.status();

        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            error!("Completion request failed with status {}", status);
            return Err(AppError::Http(format!(
                "Completion request failed with status {}: {}",
                status, body
            )));
        }

        let json: Value = res.json().await?;
        let content = json["choices"][0]["message"]["content"]
            .as_str()
            .map(str::trim)
            .unwrap_or("");

        if content.is_empty() {
            return Err(AppError::Generation(
                "Completion response had no message content".to_string(),
            ));
        }

        Ok(content.to_string())
    }
}
