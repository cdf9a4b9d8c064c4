//! HTTP client for the hosted Weaviate instance

use reqwest::{Client as ReqwestClient, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::config::Config;
use crate::store::error::StoreError;
use crate::store::query::SearchQuery;
use crate::store::{SearchHit, WebpageRecord, WEBPAGE_CLASS};

/// Default timeout for HTTP requests in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Number of records sent per batch insertion request
const DEFAULT_BATCH_SIZE: usize = 100;

/// Client for the hosted Weaviate vector store
///
/// The store computes embeddings itself (text2vec vectorizer), so the client
/// only ships text properties and GraphQL queries. Cloning is cheap; the
/// underlying connection pool is shared.
#[derive(Clone)]
pub struct StoreClient {
    /// The underlying reqwest client
    client: ReqwestClient,

    /// Base URL of the Weaviate instance
    base_url: String,

    /// API key for bearer authentication
    api_key: String,

    /// OpenAI key forwarded for the store-side text2vec-openai vectorizer
    openai_api_key: String,

    /// Number of records per insertion batch
    batch_size: usize,
}

#[cfg(test)]
impl StoreClient {
    /// Set the base URL (for testing only)
    pub fn set_base_url(&mut self, url: String) {
        self.base_url = url;
    }

    /// Set the insertion batch size (for testing only)
    pub fn set_batch_size(&mut self, batch_size: usize) {
        self.batch_size = batch_size;
    }
}

impl StoreClient {
    /// Create a client for the configured Weaviate instance
    ///
    /// Fails fast when the endpoint URL is empty or unparseable, so a
    /// misconfigured process never reaches its first search.
    pub fn connect(config: &Config) -> Result<Self, StoreError> {
        if config.weaviate_url.trim().is_empty() {
            return Err(StoreError::Config(
                "Weaviate endpoint URL is empty".to_string(),
            ));
        }

        Url::parse(&config.weaviate_url).map_err(|e| {
            StoreError::Config(format!("invalid Weaviate URL {:?}: {}", config.weaviate_url, e))
        })?;

        if config.weaviate_api_key.trim().is_empty() {
            return Err(StoreError::Config("Weaviate API key is empty".to_string()));
        }

        let client = ReqwestClient::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(StoreError::Http)?;

        info!("Connected store client to {}", config.weaviate_url);

        Ok(Self {
            client,
            base_url: config.weaviate_url.trim_end_matches('/').to_string(),
            api_key: config.weaviate_api_key.clone(),
            openai_api_key: config.openai_api_key.clone(),
            batch_size: DEFAULT_BATCH_SIZE,
        })
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(&self.api_key)
            .header("X-OpenAI-Api-Key", &self.openai_api_key)
    }

    /// Create the `Webpage` class if it does not already exist
    #[instrument(skip(self))]
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        let class = json!({
            "class": WEBPAGE_CLASS,
            "description": "A crawled university webpage",
            "vectorizer": "text2vec-openai",
            "properties": [
                {"name": "title", "dataType": ["text"]},
                {"name": "url", "dataType": ["text"]},
                {"name": "content", "dataType": ["text"]},
                {"name": "mostCommonQuestions", "dataType": ["text[]"]},
            ],
        });

        let response = self
            .request(reqwest::Method::POST, "/v1/schema")
            .json(&class)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            info!("Created {} class", WEBPAGE_CLASS);
            return Ok(());
        }

        let message = response.text().await.unwrap_or_default();

        // Weaviate answers 422 when the class is already defined
        if status == StatusCode::UNPROCESSABLE_ENTITY && message.contains("already") {
            debug!("{} class already exists", WEBPAGE_CLASS);
            return Ok(());
        }

        Err(StoreError::Api {
            status_code: status.as_u16(),
            message,
        })
    }

    /// Insert records in fixed-size batches
    ///
    /// Returns the number of records the store accepted. Per-object failures
    /// reported by the store are logged and subtracted from the count; they do
    /// not fail the call.
    #[instrument(skip(self, records), fields(count = records.len()))]
    pub async fn batch_add(&self, records: &[WebpageRecord]) -> Result<usize, StoreError> {
        let mut accepted = 0;

        for batch in records.chunks(self.batch_size) {
            let objects: Vec<Value> = batch
                .iter()
                .map(|record| {
                    json!({
                        "class": WEBPAGE_CLASS,
                        "properties": record,
                    })
                })
                .collect();

            debug!("Inserting batch of {} records", batch.len());

            let response = self
                .request(reqwest::Method::POST, "/v1/batch/objects")
                .json(&json!({ "objects": objects }))
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Err(StoreError::Api {
                    status_code: status.as_u16(),
                    message: response.text().await.unwrap_or_default(),
                });
            }

            let results: Value = response.json().await?;
            let failed = results
                .as_array()
                .map(|objects| {
                    objects
                        .iter()
                        .filter(|object| {
                            object
                                .pointer("/result/errors")
                                .is_some_and(|errors| !errors.is_null())
                        })
                        .count()
                })
                .unwrap_or(0);

            if failed > 0 {
                warn!("Store rejected {} of {} records in batch", failed, batch.len());
            }

            accepted += batch.len() - failed;
        }

        debug!("Store accepted {} of {} records", accepted, records.len());
        Ok(accepted)
    }

    /// Perform a vector search and return hits in the store's ranking order
    ///
    /// An empty result set is a normal outcome and yields an empty vector,
    /// never an error.
    #[instrument(skip(self, query), fields(class = %query.class_name, concepts = %query.concepts))]
    pub async fn vector_search(&self, query: SearchQuery) -> Result<Vec<SearchHit>, StoreError> {
        debug!("Performing vector search");

        let graphql = query.to_graphql();
        let response = self
            .request(reqwest::Method::POST, "/v1/graphql")
            .json(&json!({ "query": graphql }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Api {
                status_code: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let body: Value = response.json().await?;

        if let Some(errors) = body.get("errors") {
            return Err(StoreError::Query(errors.to_string()));
        }

        let hits = body
            .pointer(&format!("/data/Get/{}", query.class_name))
            .ok_or_else(|| {
                StoreError::UnexpectedResponse(format!(
                    "missing data.Get.{} in search response",
                    query.class_name
                ))
            })?;

        let hits: Vec<SearchHit> = serde_json::from_value(hits.clone())
            .map_err(|e| StoreError::UnexpectedResponse(format!("malformed hit list: {}", e)))?;

        debug!("Vector search returned {} hits", hits.len());
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn test_config(url: &str) -> Config {
        Config {
            openai_api_key: "sk-test".to_string(),
            weaviate_api_key: "wv-test".to_string(),
            weaviate_url: url.to_string(),
        }
    }

    fn record(url: &str) -> WebpageRecord {
        WebpageRecord {
            title: "Page".to_string(),
            url: url.to_string(),
            content: "Some page content.".to_string(),
            most_common_questions: None,
        }
    }

    #[test]
    fn test_connect_rejects_empty_url() {
        let result = StoreClient::connect(&test_config(""));
        assert!(matches!(result, Err(StoreError::Config(_))));
    }

    #[test]
    fn test_connect_rejects_invalid_url() {
        let result = StoreClient::connect(&test_config("not a url"));
        assert!(matches!(result, Err(StoreError::Config(_))));
    }

    #[test]
    fn test_connect_rejects_empty_api_key() {
        let mut config = test_config("https://store.example.net");
        config.weaviate_api_key = String::new();
        assert!(matches!(
            StoreClient::connect(&config),
            Err(StoreError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_vector_search_preserves_ranking_order() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/graphql")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"data": {"Get": {"Webpage": [
                    {"title": "Best", "url": "https://example.edu/best", "content": "top"},
                    {"title": "Second", "url": "https://example.edu/second", "content": "next"}
                ]}}}"#,
            )
            .expect(1)
            .create_async()
            .await;

        let mut client = StoreClient::connect(&test_config("https://store.example.net")).unwrap();
        client.set_base_url(server.url());

        let hits = client
            .vector_search(SearchQuery::new(WEBPAGE_CLASS, "question").limit(2))
            .await
            .unwrap();

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].url, "https://example.edu/best");
        assert_eq!(hits[1].url, "https://example.edu/second");

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_vector_search_empty_results() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/v1/graphql")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data": {"Get": {"Webpage": []}}}"#)
            .create_async()
            .await;

        let mut client = StoreClient::connect(&test_config("https://store.example.net")).unwrap();
        client.set_base_url(server.url());

        let hits = client
            .vector_search(SearchQuery::new(WEBPAGE_CLASS, "nothing matches"))
            .await
            .unwrap();

        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_vector_search_surfaces_graphql_errors() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/v1/graphql")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"errors": [{"message": "no such class"}]}"#)
            .create_async()
            .await;

        let mut client = StoreClient::connect(&test_config("https://store.example.net")).unwrap();
        client.set_base_url(server.url());

        let result = client
            .vector_search(SearchQuery::new("Missing", "anything"))
            .await;
        assert!(matches!(result, Err(StoreError::Query(_))));
    }

    #[tokio::test]
    async fn test_batch_add_splits_into_fixed_size_batches() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/batch/objects")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .expect(2)
            .create_async()
            .await;

        let mut client = StoreClient::connect(&test_config("https://store.example.net")).unwrap();
        client.set_base_url(server.url());
        client.set_batch_size(2);

        let records: Vec<WebpageRecord> = (0..3)
            .map(|i| record(&format!("https://example.edu/p{}", i)))
            .collect();

        let accepted = client.batch_add(&records).await.unwrap();
        assert_eq!(accepted, 3);

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_batch_add_counts_rejected_records() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/v1/batch/objects")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"result": {"status": "SUCCESS"}},
                    {"result": {"errors": {"error": [{"message": "invalid"}]}}}
                ]"#,
            )
            .create_async()
            .await;

        let mut client = StoreClient::connect(&test_config("https://store.example.net")).unwrap();
        client.set_base_url(server.url());

        let records = vec![
            record("https://example.edu/a"),
            record("https://example.edu/b"),
        ];
        let accepted = client.batch_add(&records).await.unwrap();
        assert_eq!(accepted, 1);
    }

    #[tokio::test]
    async fn test_ensure_schema_tolerates_existing_class() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/v1/schema")
            .with_status(422)
            .with_body(r#"{"error": [{"message": "class \"Webpage\" already exists"}]}"#)
            .create_async()
            .await;

        let mut client = StoreClient::connect(&test_config("https://store.example.net")).unwrap();
        client.set_base_url(server.url());

        client.ensure_schema().await.unwrap();
    }

    #[tokio::test]
    async fn test_ensure_schema_propagates_other_errors() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/v1/schema")
            .with_status(401)
            .with_body("unauthorized")
            .create_async()
            .await;

        let mut client = StoreClient::connect(&test_config("https://store.example.net")).unwrap();
        client.set_base_url(server.url());

        let result = client.ensure_schema().await;
        assert!(matches!(
            result,
            Err(StoreError::Api { status_code: 401, .. })
        ));
    }

    #[tokio::test]
    async fn test_requests_carry_auth_headers() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/graphql")
            .match_header("authorization", "Bearer wv-test")
            .match_header("x-openai-api-key", "sk-test")
            .match_body(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data": {"Get": {"Webpage": []}}}"#)
            .expect(1)
            .create_async()
            .await;

        let mut client = StoreClient::connect(&test_config("https://store.example.net")).unwrap();
        client.set_base_url(server.url());

        client
            .vector_search(SearchQuery::new(WEBPAGE_CLASS, "anything"))
            .await
            .unwrap();

        mock.assert_async().await;
    }
}
