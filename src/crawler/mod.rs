//! Website crawler module
//!
//! This module gathers content for the QA pipeline: it follows links from a
//! seed URL, extracts the readable article text from each page, optionally
//! derives FAQ metadata through the language model, and hands the resulting
//! records to the vector store in batches.
//!
//! A fetch or enrichment failure for one page is logged and that page is
//! skipped; it never aborts the crawl.

mod config;
mod enrich;
mod error;
mod extract;
mod filter;
mod spider_integration;

pub use config::CrawlerConfig;
pub use enrich::generate_faq;
pub use error::CrawlError;
pub use filter::{load_block_list, UrlFilter};
pub use spider_integration::crawl_site;

/// Summary of a finished crawl
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrawlReport {
    /// Pages received from the fetcher
    pub visited: usize,

    /// Pages dropped by filtering, content gating, or per-page failures
    pub skipped: usize,

    /// Records the vector store accepted
    pub indexed: usize,
}
