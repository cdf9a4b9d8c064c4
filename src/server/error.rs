//! Error responses for the query service

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Error type returned to HTTP callers
///
/// Failures surface as structured JSON rather than opaque server errors;
/// "no match found" is an explicit outcome, not a crash.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No stored page matched the question
    #[error("not found: {0}")]
    NotFound(String),

    /// The vector store or the model upstream failed
    #[error("upstream error: {0}")]
    Upstream(String),

    /// Anything else
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}
