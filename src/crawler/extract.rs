//! Content gating and title extraction
//!
//! The readable article body itself comes from the spider transformation
//! pipeline; this module holds the HTML-level helpers around it: pulling a
//! page title out of raw HTML and deciding whether extracted content is
//! substantial enough to index.

use scraper::{Html, Selector};
use url::Url;

use crate::llm::{count_tokens, DEFAULT_MODEL};

/// Whether extracted content is substantial enough to index
///
/// Empty content never qualifies, regardless of the threshold.
pub(crate) fn meets_minimum_tokens(content: &str, min_tokens: usize) -> bool {
    if content.trim().is_empty() {
        return false;
    }
    count_tokens(content, DEFAULT_MODEL) >= min_tokens
}

/// Extract the page title from raw HTML
///
/// Prefers the `<title>` element, falling back to the first `<h1>`.
pub(crate) fn extract_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    for selector in ["title", "h1"] {
        let selector = Selector::parse(selector).ok()?;
        let title = document
            .select(&selector)
            .next()
            .map(|element| element.text().collect::<String>())
            .map(|text| text.trim().to_string());

        if let Some(title) = title {
            if !title.is_empty() {
                return Some(title);
            }
        }
    }

    None
}

/// Title for a page, falling back to the URL when the HTML has none
///
/// The fallback is the last path segment, then the URL itself. An untitled
/// page never blocks indexing.
pub(crate) fn title_for(url: &str, html: &str) -> String {
    if let Some(title) = extract_title(html) {
        return title;
    }

    Url::parse(url)
        .ok()
        .and_then(|parsed| {
            parsed
                .path_segments()
                .and_then(|segments| segments.filter(|s| !s.is_empty()).next_back())
                .map(String::from)
        })
        .unwrap_or_else(|| url.to_string())
}
