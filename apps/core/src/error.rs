use std::io;
use thiserror::Error;

/// Application-wide error type for the coach layer and the binary.
///
/// The analysis core never returns errors; only collaborators that talk to
/// the outside world do.
#[derive(Debug, Error)]
pub enum AppError {
    /// Reading input failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Transport failure or non-success status from the generation service.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The service answered, but with nothing usable.
    #[error("Generation error: {0}")]
    Generation(String),

    /// Scenario input rejected before prompting.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Bad or missing configuration, including offline mode.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A generation call exceeded its time budget.
    #[error("Timed out: {0}")]
    Timeout(String),
}

impl AppError {
    /// Errors worth another attempt against the generation service
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AppError::Http(_) | AppError::Timeout(_) | AppError::Generation(_)
        )
    }
}

impl From<tokio::time::error::Elapsed> for AppError {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        AppError::Timeout(format!("generation call exceeded deadline: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Generation(format!("JSON error: {}", err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::Timeout(format!("HTTP request timed out: {}", err))
        } else {
            AppError::Http(err.to_string())
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(format!("Validation errors: {}", err))
    }
}
