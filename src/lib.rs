//! # campusqa - Retrieval-Augmented QA for University Websites
//!
//! This crate implements a small retrieval-augmented question-answering
//! pipeline over a university website. A crawler collects page content, a
//! hosted vector database (Weaviate) indexes it, and an HTTP endpoint answers
//! questions by feeding the best-matching page into a chat-completion call.
//!
//! ## Features
//!
//! - Website crawling with readability extraction and URL allow/block filtering
//! - Optional per-page FAQ enrichment through the language model
//! - Batch insertion and hybrid/near-text search against Weaviate
//! - Chat completions with streaming, transparent retry, and token-budget
//!   driven model selection
//! - An axum HTTP service exposing the question endpoint
//! - Async API with Tokio
//!
//! ## Example
//!
//! ```rust,no_run
//! use campusqa::config::Config;
//! use campusqa::llm::LlmClient;
//! use campusqa::store::{SearchQuery, StoreClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let store = StoreClient::connect(&config)?;
//!     let llm = LlmClient::new(&config);
//!
//!     let hits = store
//!         .vector_search(SearchQuery::new("Webpage", "application deadlines"))
//!         .await?;
//!
//!     if let Some(hit) = hits.first() {
//!         let answer = llm
//!             .prompt(
//!                 &format!("Question: deadlines?\nContext: {} URL: {}", hit.content, hit.url),
//!                 "You are a helpful assistant.",
//!                 "gpt-4",
//!             )
//!             .await?;
//!         println!("{}", answer);
//!     }
//!     Ok(())
//! }
//! ```

mod error;

pub mod config;
pub mod crawler;
pub mod llm;
pub mod logging;
pub mod server;
pub mod store;

pub use error::Error;

/// Re-export of common types for public use
pub mod prelude {
    pub use crate::error::Error;
    pub use crate::error::Result;
}
