//! Language model client module
//!
//! This module wraps the hosted chat-completion API used to answer questions
//! and derive FAQ metadata. It provides a synchronous prompt call, a streamed
//! variant, transparent retry with randomized exponential backoff, and token
//! counting for context-window-driven model selection.

mod client;
mod error;
mod sse;
mod tokens;

pub use client::LlmClient;
pub use error::LlmError;
pub use tokens::{
    count_tokens, select_model, DEFAULT_MODEL, LARGE_CONTEXT_MODEL, PROMPT_TOKEN_BUDGET,
};
