//! Error types for the campusqa crate

use thiserror::Error;

/// Result type for campusqa operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for campusqa operations
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Authentication error
    #[error("Authentication error: {0}")]
    Auth(String),

    /// API returned an error response
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

    /// Web crawling error
    #[error("Crawl error: {0}")]
    Crawl(String),

    /// Vector store error
    #[error("Store error: {0}")]
    Store(String),

    /// Language model error
    #[error("Model error: {0}")]
    Llm(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}
