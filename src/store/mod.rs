//! Vector store client module
//!
//! This module wraps the hosted Weaviate instance that indexes crawled
//! webpages. It exposes schema creation, fixed-size batch insertion, and
//! hybrid/near-text vector search. Embeddings are computed and owned by the
//! store; this crate never sees a vector.

mod client;
mod error;
mod query;

pub use client::StoreClient;
pub use error::StoreError;
pub use query::SearchQuery;

use serde::{Deserialize, Serialize};

/// Name of the Weaviate class holding crawled pages
pub const WEBPAGE_CLASS: &str = "Webpage";

/// A crawled webpage as stored in the vector store
///
/// Created once by the crawler per visited page and never updated or deleted
/// by this system. Field names are camelCase on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebpageRecord {
    /// Page title
    pub title: String,

    /// Page URL, unique per visited page
    pub url: String,

    /// Readability-extracted article body
    pub content: String,

    /// Up to 10 model-derived frequently-asked questions
    #[serde(
        rename = "mostCommonQuestions",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub most_common_questions: Option<Vec<String>>,
}

/// A single ranked result from a vector search
///
/// Only the requested fields are populated; everything else deserializes to
/// its default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchHit {
    /// Page title
    #[serde(default)]
    pub title: String,

    /// Page URL
    #[serde(default)]
    pub url: String,

    /// Page content
    #[serde(default)]
    pub content: String,

    /// FAQ strings, when requested and present
    #[serde(rename = "mostCommonQuestions", default)]
    pub most_common_questions: Option<Vec<String>>,
}
