//! Server-sent event parsing for streamed completions
//!
//! The completion API streams `data:` lines, each carrying a JSON chunk with
//! a content delta, and terminates with a `[DONE]` sentinel. A chunk whose
//! `finish_reason` is set also ends the stream.

use serde_json::Value;

use crate::llm::error::LlmError;

/// Outcome of parsing one line of a streamed response
#[derive(Debug, PartialEq)]
pub(crate) enum StreamEvent {
    /// A piece of answer text
    Delta(String),

    /// The upstream signalled completion; nothing follows
    Done,

    /// Keep-alive, empty delta, or non-data line
    Ignore,
}

pub(crate) fn parse_stream_line(line: &str) -> Result<StreamEvent, LlmError> {
    let Some(payload) = line.strip_prefix("data:") else {
        return Ok(StreamEvent::Ignore);
    };

    let payload = payload.trim();
    if payload.is_empty() {
        return Ok(StreamEvent::Ignore);
    }
    if payload == "[DONE]" {
        return Ok(StreamEvent::Done);
    }

    let chunk: Value = serde_json::from_str(payload)
        .map_err(|e| LlmError::UnexpectedResponse(format!("malformed stream chunk: {}", e)))?;

    if chunk
        .pointer("/choices/0/finish_reason")
        .is_some_and(|reason| !reason.is_null())
    {
        return Ok(StreamEvent::Done);
    }

    match chunk
        .pointer("/choices/0/delta/content")
        .and_then(Value::as_str)
    {
        Some(text) if !text.is_empty() => Ok(StreamEvent::Delta(text.to_string())),
        _ => Ok(StreamEvent::Ignore),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_delta() {
        let line = r#"data: {"choices": [{"delta": {"content": "Hello"}, "finish_reason": null}]}"#;
        assert_eq!(
            parse_stream_line(line).unwrap(),
            StreamEvent::Delta("Hello".to_string())
        );
    }

    #[test]
    fn test_done_sentinel() {
        assert_eq!(parse_stream_line("data: [DONE]").unwrap(), StreamEvent::Done);
    }

    #[test]
    fn test_finish_reason_terminates() {
        let line = r#"data: {"choices": [{"delta": {}, "finish_reason": "stop"}]}"#;
        assert_eq!(parse_stream_line(line).unwrap(), StreamEvent::Done);
    }

    #[test]
    fn test_blank_and_comment_lines_ignored() {
        assert_eq!(parse_stream_line("").unwrap(), StreamEvent::Ignore);
        assert_eq!(parse_stream_line(": keep-alive").unwrap(), StreamEvent::Ignore);
        assert_eq!(parse_stream_line("data:").unwrap(), StreamEvent::Ignore);
    }

    #[test]
    fn test_role_only_delta_ignored() {
        let line = r#"data: {"choices": [{"delta": {"role": "assistant"}, "finish_reason": null}]}"#;
        assert_eq!(parse_stream_line(line).unwrap(), StreamEvent::Ignore);
    }

    #[test]
    fn test_malformed_chunk_is_an_error() {
        assert!(parse_stream_line("data: {not json").is_err());
    }
}
