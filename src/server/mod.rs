//! Query service module
//!
//! The HTTP surface of the pipeline: a greeting route and the question
//! endpoint. Service clients are constructed once and injected through
//! shared state rather than held as globals; each request is handled
//! independently with no caching, history, or authentication.

mod error;
mod handlers;

pub use error::ApiError;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::error::{Error, Result};
use crate::llm::LlmClient;
use crate::store::StoreClient;

/// Shared state for request handlers
#[derive(Clone)]
pub struct AppState {
    /// Vector store client
    pub store: StoreClient,

    /// Language model client
    pub llm: LlmClient,
}

impl AppState {
    /// Bundle the service clients for injection into the router
    pub fn new(store: StoreClient, llm: LlmClient) -> Self {
        Self { store, llm }
    }
}

/// Build the service router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/question/:question", get(handlers::question))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

/// Bind and serve the query service until the process exits
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::Other(format!("Failed to bind {}: {}", addr, e)))?;

    info!("Query service listening on {}", addr);

    axum::serve(listener, router(Arc::new(state)))
        .await
        .map_err(|e| Error::Other(format!("Server error: {}", e)))
}
