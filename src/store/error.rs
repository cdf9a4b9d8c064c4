//! Error types for the store module

use crate::error::Error as CrateError;
use thiserror::Error;

/// Error type for vector store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Missing or invalid endpoint/credential configuration
    #[error("Store configuration error: {0}")]
    Config(String),

    /// The store returned an error response
    #[error("Store API error: {status_code} - {message}")]
    Api {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },

    /// The GraphQL layer reported query errors
    #[error("Store query error: {0}")]
    Query(String),

    /// Unexpected response format
    #[error("Unexpected store response: {0}")]
    UnexpectedResponse(String),
}

impl From<StoreError> for CrateError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Http(e) => CrateError::Http(e),
            StoreError::Config(msg) => CrateError::Config(msg),
            _ => CrateError::Store(err.to_string()),
        }
    }
}
