//! Token counting and model selection
//!
//! Prompt sizes are measured with the model's own tokenizer so the caller can
//! switch to a larger-context model variant before the upstream rejects the
//! request.

/// Default completion model
pub const DEFAULT_MODEL: &str = "gpt-4";

/// Larger-context model used when the prompt exceeds the token budget
pub const LARGE_CONTEXT_MODEL: &str = "gpt-3.5-turbo-16k";

/// Prompt sizes above this are routed to [`LARGE_CONTEXT_MODEL`]
pub const PROMPT_TOKEN_BUDGET: usize = 4000;

/// Count tokens for the given model's tokenizer
///
/// Falls back to a chars/4 estimate when no tokenizer is known for the model.
pub fn count_tokens(text: &str, model: &str) -> usize {
    match tiktoken_rs::get_bpe_from_model(model) {
        Ok(bpe) => bpe.encode_with_special_tokens(text).len(),
        Err(_) => text.chars().count() / 4,
    }
}

/// Pick the completion model for a prompt of the given token count
pub fn select_model(token_count: usize) -> &'static str {
    if token_count > PROMPT_TOKEN_BUDGET {
        LARGE_CONTEXT_MODEL
    } else {
        DEFAULT_MODEL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_model_under_budget() {
        assert_eq!(select_model(0), DEFAULT_MODEL);
        assert_eq!(select_model(PROMPT_TOKEN_BUDGET), DEFAULT_MODEL);
    }

    #[test]
    fn test_select_model_over_budget() {
        assert_eq!(select_model(PROMPT_TOKEN_BUDGET + 1), LARGE_CONTEXT_MODEL);
        assert_eq!(select_model(100_000), LARGE_CONTEXT_MODEL);
    }

    #[test]
    fn test_count_tokens_empty() {
        assert_eq!(count_tokens("", DEFAULT_MODEL), 0);
    }

    #[test]
    fn test_count_tokens_nonempty() {
        let count = count_tokens("What are the admission requirements?", DEFAULT_MODEL);
        assert!(count > 0);
        assert!(count < "What are the admission requirements?".len());
    }

    #[test]
    fn test_count_tokens_unknown_model_falls_back() {
        let text = "aaaa".repeat(100);
        assert_eq!(count_tokens(&text, "no-such-model"), text.chars().count() / 4);
    }
}
