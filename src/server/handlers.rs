//! Request handlers for the query service

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, instrument};

use crate::llm::{count_tokens, select_model, DEFAULT_MODEL};
use crate::server::error::ApiError;
use crate::server::AppState;
use crate::store::{SearchQuery, WEBPAGE_CLASS};

/// System role for answering questions
const ANSWER_ROLE: &str =
    "You are an admissions officer answering questions about the university. \
     Use only the provided context to answer. Do not add an email signature. \
     Make sure to always include the webpage link.";

/// Hybrid ranking properties for the question search
const HYBRID_PROPERTIES: [&str; 3] = ["mostCommonQuestions^3", "content", "title^5"];

/// Greeting route
pub(crate) async fn root() -> impl IntoResponse {
    Json(json!({ "message": "Hello World!" }))
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuestionParams {
    /// Stream the answer as it is produced (default) or buffer it into JSON
    #[serde(default = "default_stream")]
    pub(crate) stream: bool,
}

fn default_stream() -> bool {
    true
}

/// Answer a question from the best-matching stored page
#[instrument(skip(state, params))]
pub(crate) async fn question(
    State(state): State<Arc<AppState>>,
    Path(question): Path<String>,
    Query(params): Query<QuestionParams>,
) -> Result<Response, ApiError> {
    let search = SearchQuery::new(WEBPAGE_CLASS, question.clone())
        .fields(vec![
            "title".to_string(),
            "content".to_string(),
            "url".to_string(),
        ])
        .hybrid_properties(HYBRID_PROPERTIES.iter().map(|p| p.to_string()).collect());

    let hits = state.store.vector_search(search).await.map_err(|e| {
        error!("Vector search failed: {}", e);
        ApiError::Upstream(format!("vector search failed: {}", e))
    })?;

    let hit = hits
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::NotFound("no matching page found".to_string()))?;

    let prompt_content = format!(
        "Question: {}\nContext: {} URL: {}",
        question, hit.content, hit.url
    );

    let token_count = count_tokens(&prompt_content, DEFAULT_MODEL);
    let model = select_model(token_count);
    info!("Using model: {}", model);

    if params.stream {
        let stream = state
            .llm
            .prompt_stream(&prompt_content, ANSWER_ROLE, model)
            .await
            .map_err(|e| {
                error!("Streamed completion failed: {}", e);
                ApiError::Upstream(format!("completion failed: {}", e))
            })?;

        Response::builder()
            .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(Body::from_stream(stream))
            .map_err(|e| ApiError::Internal(e.to_string()))
    } else {
        let answer = state
            .llm
            .prompt(&prompt_content, ANSWER_ROLE, model)
            .await
            .map_err(|e| {
                error!("Completion failed: {}", e);
                ApiError::Upstream(format!("completion failed: {}", e))
            })?;

        Ok(Json(json!({ "response": answer })).into_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::llm::LlmClient;
    use crate::store::StoreClient;
    use axum::http::StatusCode;
    use mockito::{Matcher, Server, ServerGuard};

    async fn state_for(store_server: &ServerGuard, llm_server: &ServerGuard) -> Arc<AppState> {
        let config = Config {
            openai_api_key: "sk-test".to_string(),
            weaviate_api_key: "wv-test".to_string(),
            weaviate_url: store_server.url(),
        };

        let store = StoreClient::connect(&config).unwrap();
        let mut llm = LlmClient::new(&config);
        llm.set_base_url(llm_server.url());

        Arc::new(AppState::new(store, llm))
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_root_greets() {
        let response = root().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, r#"{"message":"Hello World!"}"#);
    }

    #[tokio::test]
    async fn test_question_uses_top_ranked_hit() {
        let mut store_server = Server::new_async().await;
        store_server
            .mock("POST", "/v1/graphql")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"data": {"Get": {"Webpage": [
                    {"title": "CS", "url": "https://example.edu/cs", "content": "top-ranked context"},
                    {"title": "Other", "url": "https://example.edu/other", "content": "runner-up context"}
                ]}}}"#,
            )
            .create_async()
            .await;

        let mut llm_server = Server::new_async().await;
        // Only matches when the prompt was assembled from the first hit
        let completion = llm_server
            .mock("POST", "/v1/chat/completions")
            .match_body(Matcher::Regex("top-ranked context".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"choices": [{"message": {"content": "See https://example.edu/cs for details."}}]}"#,
            )
            .expect(1)
            .create_async()
            .await;

        let state = state_for(&store_server, &llm_server).await;
        let response = question(
            State(state),
            Path("What are the requirements?".to_string()),
            Query(QuestionParams { stream: false }),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("https://example.edu/cs"));

        completion.assert_async().await;
    }

    #[tokio::test]
    async fn test_question_streams_chunks() {
        let mut store_server = Server::new_async().await;
        store_server
            .mock("POST", "/v1/graphql")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"data": {"Get": {"Webpage": [
                    {"title": "CS", "url": "https://example.edu/cs", "content": "context"}
                ]}}}"#,
            )
            .create_async()
            .await;

        let mut llm_server = Server::new_async().await;
        llm_server
            .mock("POST", "/v1/chat/completions")
            .match_body(Matcher::PartialJson(json!({"stream": true})))
            .with_status(200)
            .with_header("content-type", "text/event-stream")
            .with_body(concat!(
                "data: {\"choices\": [{\"delta\": {\"content\": \"Apply \"}, \"finish_reason\": null}]}\n\n",
                "data: {\"choices\": [{\"delta\": {\"content\": \"by March.\"}, \"finish_reason\": null}]}\n\n",
                "data: [DONE]\n\n",
            ))
            .create_async()
            .await;

        let state = state_for(&store_server, &llm_server).await;
        let response = question(
            State(state),
            Path("When is the deadline?".to_string()),
            Query(QuestionParams { stream: true }),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .unwrap()
                .to_str()
                .unwrap(),
            "text/plain; charset=utf-8"
        );
        assert_eq!(body_string(response).await, "Apply by March.");
    }

    #[tokio::test]
    async fn test_question_without_match_is_404() {
        let mut store_server = Server::new_async().await;
        store_server
            .mock("POST", "/v1/graphql")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data": {"Get": {"Webpage": []}}}"#)
            .create_async()
            .await;

        let llm_server = Server::new_async().await;
        let state = state_for(&store_server, &llm_server).await;

        let result = question(
            State(state),
            Path("Anything at all?".to_string()),
            Query(QuestionParams { stream: false }),
        )
        .await;

        let response = result.unwrap_err().into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_string(response).await.contains("no matching page found"));
    }

    #[tokio::test]
    async fn test_question_store_failure_is_502() {
        let mut store_server = Server::new_async().await;
        store_server
            .mock("POST", "/v1/graphql")
            .with_status(500)
            .with_body("store exploded")
            .create_async()
            .await;

        let llm_server = Server::new_async().await;
        let state = state_for(&store_server, &llm_server).await;

        let result = question(
            State(state),
            Path("Anything at all?".to_string()),
            Query(QuestionParams { stream: false }),
        )
        .await;

        let response = result.unwrap_err().into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
