//! FAQ enrichment through the language model
//!
//! Optionally asks the model for up to ten frequently-asked questions per
//! page. The answers become the `mostCommonQuestions` property, which the
//! query path boosts during hybrid search.

use std::num::NonZeroU32;

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use tracing::trace;

use crate::llm::{count_tokens, select_model, LlmClient, LlmError, DEFAULT_MODEL};

/// Most questions attached to a single page
const MAX_FAQ: usize = 10;

/// Enrichment calls allowed per minute across the whole crawl
const FAQ_CALLS_PER_MINUTE: u32 = 30;

const FAQ_ROLE: &str =
    "You are an assistant helping a university publish its website content. \
     You extract the questions visitors most commonly ask.";

const FAQ_INSTRUCTION: &str =
    "List up to 10 frequently asked questions that the following webpage \
     content answers. Write one question per line with no numbering.";

/// Rate limiter shared by all FAQ enrichment tasks of a crawl
pub(crate) fn faq_rate_limiter() -> DefaultDirectRateLimiter {
    RateLimiter::direct(Quota::per_minute(
        NonZeroU32::new(FAQ_CALLS_PER_MINUTE).expect("must create rate limit"),
    ))
}

/// Ask the model for up to ten frequently-asked questions about the content
pub async fn generate_faq(llm: &LlmClient, content: &str) -> Result<Vec<String>, LlmError> {
    let prompt = format!("{}\n\n{}", FAQ_INSTRUCTION, content);
    let model = select_model(count_tokens(&prompt, DEFAULT_MODEL));

    let reply = llm.prompt(&prompt, FAQ_ROLE, model).await?;
    let questions = parse_faq_list(&reply);

    trace!("Derived {} questions", questions.len());
    Ok(questions)
}

/// Parse the model's reply into a question list
///
/// Tolerates numbering and bullet markers the model adds despite the
/// instruction, and caps the list at ten entries.
pub(crate) fn parse_faq_list(reply: &str) -> Vec<String> {
    reply
        .lines()
        .map(strip_list_marker)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .take(MAX_FAQ)
        .collect()
}

fn strip_list_marker(line: &str) -> &str {
    let line = line.trim().trim_start_matches(['-', '*']).trim_start();

    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        if let Some(rest) = line[digits..]
            .strip_prefix('.')
            .or_else(|| line[digits..].strip_prefix(')'))
        {
            return rest.trim_start();
        }
    }

    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_lines() {
        let reply = "What are the requirements?\nHow do I apply?\n";
        assert_eq!(
            parse_faq_list(reply),
            vec!["What are the requirements?", "How do I apply?"]
        );
    }

    #[test]
    fn test_parse_strips_numbering_and_bullets() {
        let reply = "1. What are the requirements?\n2) How do I apply?\n- Is housing available?\n* Who do I contact?";
        assert_eq!(
            parse_faq_list(reply),
            vec![
                "What are the requirements?",
                "How do I apply?",
                "Is housing available?",
                "Who do I contact?"
            ]
        );
    }

    #[test]
    fn test_parse_caps_at_ten() {
        let reply = (1..=15)
            .map(|i| format!("{}. Question {}?", i, i))
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(parse_faq_list(&reply).len(), 10);
    }

    #[test]
    fn test_parse_skips_blank_lines() {
        let reply = "\nWhat are the requirements?\n\n   \nHow do I apply?";
        assert_eq!(parse_faq_list(reply).len(), 2);
    }

    #[test]
    fn test_year_prefixed_question_is_kept_intact() {
        // digits without a list delimiter are content, not a marker
        let reply = "2026 application deadlines?";
        assert_eq!(parse_faq_list(reply), vec!["2026 application deadlines?"]);
    }
}
