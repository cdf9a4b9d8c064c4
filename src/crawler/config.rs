//! Crawler configuration
//!
//! Builder-pattern configuration for the crawler: URL filtering inputs,
//! politeness controls, content gating, and FAQ enrichment settings.

use std::time::Duration;

/// Configuration for the crawler
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// Domains the crawler may visit besides the seed's own
    pub allowed_domains: Vec<String>,

    /// URL substrings that must never be visited
    pub blocked_urls: Vec<String>,

    /// Maximum depth to crawl
    pub max_depth: u32,

    /// Maximum number of pages to crawl
    pub max_pages: u32,

    /// Delay in milliseconds between requests (politeness throttle,
    /// target one in-flight request)
    pub rate_limit_ms: u64,

    /// Whether to respect robots.txt
    pub respect_robots_txt: bool,

    /// User agent to use for requests
    pub user_agent: String,

    /// Pages whose extracted content counts fewer tokens are skipped
    pub min_content_tokens: usize,

    /// Whether to derive FAQ metadata for each page
    pub generate_faq: bool,

    /// Bound on concurrent FAQ enrichment tasks
    pub faq_concurrency: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            allowed_domains: Vec::new(),
            blocked_urls: Vec::new(),
            max_depth: 2,
            max_pages: 100,
            rate_limit_ms: 500,
            respect_robots_txt: true,
            user_agent: format!("campusqa-crawler/{}", env!("CARGO_PKG_VERSION")),
            min_content_tokens: 25,
            generate_faq: false,
            faq_concurrency: 4,
        }
    }
}

/// Builder for CrawlerConfig
#[derive(Debug, Default)]
pub struct CrawlerConfigBuilder {
    config: CrawlerConfig,
}

impl CrawlerConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: CrawlerConfig::default(),
        }
    }

    /// Set the domains the crawler may visit
    pub fn allowed_domains(mut self, allowed_domains: Vec<String>) -> Self {
        self.config.allowed_domains = allowed_domains;
        self
    }

    /// Set the URL substrings that must never be visited
    pub fn blocked_urls(mut self, blocked_urls: Vec<String>) -> Self {
        self.config.blocked_urls = blocked_urls;
        self
    }

    /// Set the maximum depth to crawl
    pub fn max_depth(mut self, max_depth: u32) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    /// Set the maximum number of pages to crawl
    pub fn max_pages(mut self, max_pages: u32) -> Self {
        self.config.max_pages = max_pages;
        self
    }

    /// Set the delay in milliseconds between requests
    pub fn rate_limit_ms(mut self, rate_limit_ms: u64) -> Self {
        self.config.rate_limit_ms = rate_limit_ms;
        self
    }

    /// Set whether to respect robots.txt
    pub fn respect_robots_txt(mut self, respect_robots_txt: bool) -> Self {
        self.config.respect_robots_txt = respect_robots_txt;
        self
    }

    /// Set the user agent to use for requests
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Set the minimum extracted-content token count
    pub fn min_content_tokens(mut self, min_content_tokens: usize) -> Self {
        self.config.min_content_tokens = min_content_tokens;
        self
    }

    /// Enable or disable FAQ enrichment
    pub fn generate_faq(mut self, generate_faq: bool) -> Self {
        self.config.generate_faq = generate_faq;
        self
    }

    /// Set the bound on concurrent FAQ enrichment tasks
    pub fn faq_concurrency(mut self, faq_concurrency: usize) -> Self {
        self.config.faq_concurrency = faq_concurrency.max(1);
        self
    }

    /// Build the configuration
    pub fn build(self) -> CrawlerConfig {
        self.config
    }
}

impl CrawlerConfig {
    /// Create a new builder
    pub fn builder() -> CrawlerConfigBuilder {
        CrawlerConfigBuilder::new()
    }

    /// Get the rate limit as a Duration
    pub fn rate_limit(&self) -> Duration {
        Duration::from_millis(self.rate_limit_ms)
    }
}
