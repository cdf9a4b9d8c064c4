//! HTTP client for the chat-completion API

use std::pin::Pin;
use std::time::Duration;

use futures::Stream;
use rand::{thread_rng, Rng};
use reqwest::{Client as ReqwestClient, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio_stream::StreamExt;
use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use crate::llm::error::LlmError;
use crate::llm::sse::{parse_stream_line, StreamEvent};

/// Default timeout for HTTP requests in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Shortest retry delay in seconds
const MIN_BACKOFF_SECS: f64 = 1.0;

/// Longest retry delay in seconds
const MAX_BACKOFF_SECS: f64 = 60.0;

/// Client for the OpenAI chat-completion API
///
/// Transient upstream failures (rate limiting, 5xx, transport errors) are
/// retried transparently with randomized exponential backoff; the delay is
/// clamped to 1-60 seconds and there is no attempt bound. Non-transient
/// failures surface immediately.
#[derive(Clone)]
pub struct LlmClient {
    /// The underlying reqwest client
    client: ReqwestClient,

    /// Base URL for API requests
    base_url: String,

    /// API key for bearer authentication
    api_key: String,
}

#[cfg(test)]
impl LlmClient {
    /// Set the base URL (for testing only)
    pub fn set_base_url(&mut self, url: String) {
        self.base_url = url;
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl LlmClient {
    /// Create a client authenticated with the configured API key
    pub fn new(config: &Config) -> Self {
        info!("Authenticating with the completion API");

        let client = ReqwestClient::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: "https://api.openai.com".to_string(),
            api_key: config.openai_api_key.clone(),
        }
    }

    fn chat_body(content: &str, role: &str, model: &str, stream: bool) -> Value {
        json!({
            "model": model,
            "stream": stream,
            "messages": [
                {"role": "system", "content": role},
                {"role": "user", "content": content},
            ],
        })
    }

    /// Send a completion request, retrying transient failures
    async fn send_with_retry(&self, body: &Value) -> Result<reqwest::Response, LlmError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let mut attempt: u32 = 0;

        loop {
            let result = self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(body)
                .send()
                .await;

            let response = match result {
                Ok(response) => response,
                Err(e) => {
                    attempt += 1;
                    let delay = backoff_delay(attempt);
                    warn!(
                        "Transport error from completion API: {}. Retrying in {:.1}s (attempt {})",
                        e,
                        delay.as_secs_f64(),
                        attempt
                    );
                    tokio::time::sleep(delay).await;
                    continue;
                }
            };

            let status = response.status();
            if status.is_success() {
                return Ok(response);
            }

            if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                attempt += 1;
                let delay = backoff_delay(attempt);
                warn!(
                    "Completion API returned {}. Retrying in {:.1}s (attempt {})",
                    status,
                    delay.as_secs_f64(),
                    attempt
                );
                tokio::time::sleep(delay).await;
                continue;
            }

            let message = response.text().await.unwrap_or_default();
            return if status == StatusCode::UNAUTHORIZED {
                Err(LlmError::Auth("Invalid API key or credentials".to_string()))
            } else {
                Err(LlmError::Api {
                    status_code: status.as_u16(),
                    message,
                })
            };
        }
    }

    /// Send a chat-style completion request and return the full answer
    #[instrument(skip(self, content, role), fields(model = model))]
    pub async fn prompt(&self, content: &str, role: &str, model: &str) -> Result<String, LlmError> {
        debug!("Asking {}", model);

        let body = Self::chat_body(content, role, model, false);
        let response = self.send_with_retry(&body).await?;

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::UnexpectedResponse(format!("malformed completion: {}", e)))?;

        chat.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmError::UnexpectedResponse("completion had no choices".to_string()))
    }

    /// Send a chat-style completion request and stream the answer
    ///
    /// Yields incremental content pieces as the upstream emits them. The
    /// stream ends when the upstream signals completion; nothing is emitted
    /// after that signal.
    #[instrument(skip(self, content, role), fields(model = model))]
    pub async fn prompt_stream(
        &self,
        content: &str,
        role: &str,
        model: &str,
    ) -> Result<Pin<Box<dyn Stream<Item = Result<String, LlmError>> + Send>>, LlmError> {
        debug!("Asking {} (streaming)", model);

        let body = Self::chat_body(content, role, model, true);
        let response = self.send_with_retry(&body).await?;

        let stream = async_stream::try_stream! {
            let mut bytes = response.bytes_stream();
            let mut buffer = String::new();

            'upstream: while let Some(chunk) = bytes.next().await {
                let chunk = chunk.map_err(LlmError::Http)?;
                buffer.push_str(&String::from_utf8_lossy(&chunk));

                while let Some(newline) = buffer.find('\n') {
                    let line: String = buffer.drain(..=newline).collect();

                    match parse_stream_line(line.trim_end())? {
                        StreamEvent::Delta(text) => yield text,
                        StreamEvent::Done => break 'upstream,
                        StreamEvent::Ignore => {}
                    }
                }
            }
        };

        Ok(Box::pin(stream))
    }
}

/// Randomized exponential backoff delay for the given attempt
///
/// Doubles per attempt from a 1 second base, with +/-20% jitter, clamped to
/// the 1-60 second range.
fn backoff_delay(attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1).min(6);
    let base = 2u64.saturating_pow(exponent) as f64;
    let jitter = thread_rng().gen_range(0.8..1.2);
    Duration::from_secs_f64((base * jitter).clamp(MIN_BACKOFF_SECS, MAX_BACKOFF_SECS))
}
