//! URL allow/block filtering
//!
//! A URL is eligible when its host falls within an allowed domain (or no
//! allow-list is configured) and the URL contains none of the block-listed
//! substrings. The block list can be loaded from a local file with one
//! substring per line.

use std::io;
use std::path::Path;

use url::Url;

/// Decides which URLs the crawler may visit
#[derive(Debug, Clone)]
pub struct UrlFilter {
    allowed_domains: Vec<String>,
    blocked_substrings: Vec<String>,
}

impl UrlFilter {
    /// Create a filter from an allow-list of domains and a block-list of
    /// URL substrings
    pub fn new(allowed_domains: Vec<String>, blocked_substrings: Vec<String>) -> Self {
        Self {
            allowed_domains,
            blocked_substrings,
        }
    }

    /// Whether the crawler may visit the given URL
    pub fn is_allowed(&self, url: &str) -> bool {
        if self
            .blocked_substrings
            .iter()
            .any(|blocked| url.contains(blocked.as_str()))
        {
            return false;
        }

        if self.allowed_domains.is_empty() {
            return true;
        }

        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        let Some(host) = parsed.host_str() else {
            return false;
        };

        self.allowed_domains
            .iter()
            .any(|domain| host == domain || host.ends_with(&format!(".{}", domain)))
    }
}

/// Load a block list from a file: one substring per line, blank lines and
/// `#` comments ignored
pub fn load_block_list(path: &Path) -> io::Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect())
}
