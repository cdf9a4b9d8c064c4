//! Error types for the llm module

use crate::error::Error as CrateError;
use thiserror::Error;

/// Error type for language model operations
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Authentication error
    #[error("Authentication error: {0}")]
    Auth(String),

    /// The API returned a non-retryable error response
    #[error("API error: {status_code} - {message}")]
    Api {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },

    /// Unexpected response format
    #[error("Unexpected response format: {0}")]
    UnexpectedResponse(String),
}

impl From<LlmError> for CrateError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Http(e) => CrateError::Http(e),
            LlmError::Auth(msg) => CrateError::Auth(msg),
            _ => CrateError::Llm(err.to_string()),
        }
    }
}
