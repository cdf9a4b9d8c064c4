//! Integration with the spider engine
//!
//! Pages arrive over a subscription channel while the engine walks the site.
//! Each page is filtered, gated on extracted content, optionally enriched
//! with FAQ metadata in a bounded task group, and the surviving records are
//! pushed to the vector store in batches once the crawl drains.

use std::collections::HashSet;
use std::sync::Arc;

use spider::website::Website;
use spider_utils::spider_transformations::transformation::content::{
    transform_content, ReturnFormat, TransformConfig,
};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, instrument, warn};

use crate::crawler::enrich::{faq_rate_limiter, generate_faq};
use crate::crawler::error::CrawlError;
use crate::crawler::extract::{meets_minimum_tokens, title_for};
use crate::crawler::filter::UrlFilter;
use crate::crawler::{CrawlReport, CrawlerConfig};
use crate::llm::LlmClient;
use crate::store::{StoreClient, WebpageRecord};

/// Crawl a site and index every eligible page
///
/// Visits pages reachable from `url` within the configured depth and page
/// limits, skipping URLs the filter rejects and pages whose extracted
/// content is empty or under the minimum token threshold. When FAQ
/// enrichment is enabled and a model client is given, each page's questions
/// are derived in a bounded task group; the crawl waits for every task
/// before inserting, so no enrichment work is lost at exit.
///
/// A failure on one page is logged and that page is skipped; the crawl
/// continues.
#[instrument(skip(config, store, llm))]
pub async fn crawl_site(
    url: &str,
    config: CrawlerConfig,
    store: &StoreClient,
    llm: Option<LlmClient>,
) -> Result<CrawlReport, CrawlError> {
    info!("Starting crawl for {}", url);
    debug!("Crawler config: {:?}", config);

    let filter = UrlFilter::new(config.allowed_domains.clone(), config.blocked_urls.clone());

    let mut website = Website::new(url);
    website
        .configuration
        .with_respect_robots_txt(config.respect_robots_txt)
        .with_user_agent(Some(&config.user_agent))
        .with_delay(config.rate_limit_ms)
        .with_depth(config.max_depth.try_into().unwrap_or(0))
        .with_limit(config.max_pages)
        .with_blacklist_url(Some(
            config
                .blocked_urls
                .iter()
                .map(|blocked| blocked.as_str().into())
                .collect(),
        ));

    if !config.allowed_domains.is_empty() {
        website
            .configuration
            .with_external_domains(Some(config.allowed_domains.iter().cloned()));
    }

    let mut rx = website
        .subscribe(16)
        .ok_or_else(|| CrawlError::Other("Failed to subscribe to website".to_string()))?;

    let worker = tokio::spawn({
        let filter = filter.clone();
        let config = config.clone();
        let llm = llm.clone();

        async move {
            let mut visited: HashSet<String> = HashSet::new();
            let mut report = CrawlReport::default();

            let semaphore = Arc::new(Semaphore::new(config.faq_concurrency));
            let limiter = Arc::new(faq_rate_limiter());
            let mut tasks: JoinSet<Result<WebpageRecord, CrawlError>> = JoinSet::new();

            while let Ok(page) = rx.recv().await {
                let page_url = page.get_url().to_string();
                if !visited.insert(page_url.clone()) {
                    continue;
                }
                report.visited += 1;

                if !filter.is_allowed(&page_url) {
                    debug!("Skipping filtered URL: {}", page_url);
                    report.skipped += 1;
                    continue;
                }

                let transform_config = TransformConfig {
                    return_format: ReturnFormat::Markdown,
                    readability: true,
                    main_content: true,
                    ..Default::default()
                };
                let content = transform_content(&page, &transform_config, &None, &None, &None);

                if !meets_minimum_tokens(&content, config.min_content_tokens) {
                    debug!("Skipping page with thin content: {}", page_url);
                    report.skipped += 1;
                    continue;
                }

                let title = title_for(&page_url, &page.get_html());

                let llm = llm.clone();
                let generate = config.generate_faq;
                let semaphore = semaphore.clone();
                let limiter = limiter.clone();

                tasks.spawn(async move {
                    let _permit = semaphore
                        .acquire_owned()
                        .await
                        .map_err(|e| CrawlError::Other(format!("Semaphore closed: {}", e)))?;

                    let most_common_questions = match llm.filter(|_| generate) {
                        Some(llm) => {
                            limiter.until_ready().await;
                            match generate_faq(&llm, &content).await {
                                Ok(questions) if !questions.is_empty() => Some(questions),
                                Ok(_) => None,
                                Err(e) => {
                                    warn!("FAQ generation failed for {}: {}", page_url, e);
                                    None
                                }
                            }
                        }
                        None => None,
                    };

                    Ok(WebpageRecord {
                        title,
                        url: page_url,
                        content,
                        most_common_questions,
                    })
                });
            }

            // Drain every enrichment task before handing records back
            let mut records = Vec::new();
            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok(Ok(record)) => records.push(record),
                    Ok(Err(e)) => {
                        error!("Page processing failed: {}", e);
                        report.skipped += 1;
                    }
                    Err(e) => {
                        error!("Page processing task panicked: {}", e);
                        report.skipped += 1;
                    }
                }
            }

            (records, report)
        }
    });

    website.crawl().await;
    info!("Crawl finished");
    website.unsubscribe();

    let (records, mut report) = worker
        .await
        .map_err(|e| CrawlError::Other(format!("Task join error: {}", e)))?;

    if records.is_empty() {
        info!("No pages eligible for indexing");
        return Ok(report);
    }

    report.indexed = store
        .batch_add(&records)
        .await
        .map_err(|e| CrawlError::Store(e.to_string()))?;

    info!(
        "Crawl indexed {} of {} visited pages",
        report.indexed, report.visited
    );
    Ok(report)
}
