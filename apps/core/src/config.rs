//! Coach configuration read from the environment.
//!
//! The binary loads `.env` with `dotenv` before calling [`CoachConfig::from_env`].

use std::env;
use std::time::Duration;

use crate::error::AppError;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 20;
pub const DEFAULT_MODEL_ATTEMPTS: u32 = 2;
pub const DEFAULT_ACCEPTANCE_THRESHOLD: i32 = 70;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoachConfig {
    /// Missing key means offline mode
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub request_timeout: Duration,
    /// Generation attempts for the model sentence before the fallback is used
    pub model_attempts: u32,
    /// Minimum core score a generated model sentence needs
    pub acceptance_threshold: i32,
}

impl Default for CoachConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            model_attempts: DEFAULT_MODEL_ATTEMPTS,
            acceptance_threshold: DEFAULT_ACCEPTANCE_THRESHOLD,
        }
    }
}

impl CoachConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = Self::default();

        let api_key = env::var("OPENAI_API_KEY")
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        let base_url = env::var("OPENAI_BASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .unwrap_or(defaults.base_url);

        let model = env::var("OPENAI_MODEL")
            .ok()
            .filter(|model| !model.trim().is_empty())
            .unwrap_or(defaults.model);

        let timeout_secs: u64 =
            parse_var("KINDWORDS_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?;
        let model_attempts: u32 = parse_var("KINDWORDS_MODEL_ATTEMPTS", DEFAULT_MODEL_ATTEMPTS)?;
        let acceptance_threshold: i32 =
            parse_var("KINDWORDS_ACCEPTANCE_THRESHOLD", DEFAULT_ACCEPTANCE_THRESHOLD)?;

        if timeout_secs == 0 {
            return Err(AppError::Config(
                "KINDWORDS_REQUEST_TIMEOUT_SECS must be greater than 0".to_string(),
            ));
        }
        if model_attempts == 0 {
            return Err(AppError::Config(
                "KINDWORDS_MODEL_ATTEMPTS must be at least 1".to_string(),
            ));
        }
        if !(0..=100).contains(&acceptance_threshold) {
            return Err(AppError::Config(format!(
                "KINDWORDS_ACCEPTANCE_THRESHOLD must be between 0 and 100, got {}",
                acceptance_threshold
            )));
        }

        Ok(Self {
            api_key,
            base_url,
            model,
            request_timeout: Duration::from_secs(timeout_secs),
            model_attempts,
            acceptance_threshold,
        })
    }

    pub fn is_online(&self) -> bool {
        self.api_key.is_some()
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, AppError> {
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} is not a valid number: {:?}", name, raw))),
        _ => Ok(default),
    }
}
