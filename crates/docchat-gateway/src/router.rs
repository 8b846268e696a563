use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::{
    chat_handler, chat_page, clear_handler, health_handler, ingest_handler, parse_handler,
    upload_page,
};
use crate::server::AppState;

/// Build the gateway router over shared application state.
#[must_use]
pub fn build_router(state: AppState, max_body_size: usize) -> Router {
    Router::new()
        .route("/", get(chat_page))
        .route("/upload", get(upload_page))
        .route("/health", get(health_handler))
        .route("/api/ingest", post(ingest_handler))
        .route("/api/chat", post(chat_handler))
        .route("/api/parse", post(parse_handler))
        .route("/api/clear", post(clear_handler))
        // axum's built-in 2 MiB cap would otherwise override the configured limit
        .layer(DefaultBodyLimit::max(max_body_size))
        .layer(RequestBodyLimitLayer::new(max_body_size))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Instant;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use docchat_llm::AnyProvider;
    use docchat_llm::mock::MockProvider;
    use docchat_parse::ParseClient;
    use docchat_store::{InMemoryVectorStore, VectorStore};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;

    const COLLECTION: &str = "chunks";

    async fn test_state(provider: MockProvider) -> AppState {
        let store = Arc::new(InMemoryVectorStore::new());
        store.ensure_collection(COLLECTION, 8).await.unwrap();
        AppState {
            provider: AnyProvider::Mock(provider),
            store,
            parser: ParseClient::new("key".into(), "http://127.0.0.1:1".into(), "model".into()),
            collection: COLLECTION.into(),
            vector_size: 8,
            top_k: 5,
            batch_size: 100,
            started_at: Instant::now(),
        }
    }

    async fn make_router(provider: MockProvider) -> Router {
        build_router(test_state(provider).await, 1_048_576)
    }

    fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap()
    }

    async fn response_json(resp: axum::response::Response) -> serde_json::Value {
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let app = make_router(MockProvider::default()).await;
        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = response_json(resp).await;
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn chat_page_served_at_root() {
        let app = make_router(MockProvider::default()).await;
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        let page = String::from_utf8(body.to_vec()).unwrap();
        assert!(page.contains("<html"));
        assert!(page.contains("/api/chat"));
    }

    #[tokio::test]
    async fn upload_page_served() {
        let app = make_router(MockProvider::default()).await;
        let req = Request::builder()
            .uri("/upload")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert!(String::from_utf8(body.to_vec()).unwrap().contains("/api/parse"));
    }

    #[tokio::test]
    async fn ingest_happy_path_reports_chunks_and_stats() {
        let app = make_router(MockProvider::default()).await;
        let req = json_request(
            "/api/ingest",
            serde_json::json!({
                "documentId": "doc-1",
                "htmlContent": "<p>one</p><p>two</p><p>three</p>"
            }),
        );
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = response_json(resp).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["chunksProcessed"], 3);
        assert_eq!(json["indexStats"]["vectorCount"], 3);
    }

    #[tokio::test]
    async fn ingest_missing_fields_is_400() {
        let app = make_router(MockProvider::default()).await;
        let req = json_request("/api/ingest", serde_json::json!({"documentId": "doc-1"}));
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = response_json(resp).await;
        assert!(
            json["error"]
                .as_str()
                .unwrap()
                .contains("documentId and htmlContent")
        );
    }

    #[tokio::test]
    async fn ingest_without_qualifying_chunks_is_400_and_makes_no_calls() {
        let provider = MockProvider::default();
        let app = make_router(provider.clone()).await;
        let req = json_request(
            "/api/ingest",
            serde_json::json!({
                "documentId": "doc-1",
                "htmlContent": "<div>no qualifying elements here</div>"
            }),
        );
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = response_json(resp).await;
        assert!(json["error"].as_str().unwrap().contains("no text content"));
        assert_eq!(provider.embed_calls(), 0);
    }

    #[tokio::test]
    async fn ingest_embedding_failure_is_500_with_cause() {
        let app = make_router(MockProvider::failing()).await;
        let req = json_request(
            "/api/ingest",
            serde_json::json!({
                "documentId": "doc-1",
                "htmlContent": "<p>content</p>"
            }),
        );
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = response_json(resp).await;
        assert!(
            json["error"]
                .as_str()
                .unwrap()
                .starts_with("failed to ingest document")
        );
    }

    #[tokio::test]
    async fn chat_empty_query_is_400_before_any_embedding() {
        let provider = MockProvider::default();
        let app = make_router(provider.clone()).await;
        let req = json_request("/api/chat", serde_json::json!({"query": "   "}));
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(provider.embed_calls(), 0);
        assert_eq!(provider.chat_calls(), 0);
    }

    #[tokio::test]
    async fn chat_missing_query_is_400() {
        let app = make_router(MockProvider::default()).await;
        let req = json_request("/api/chat", serde_json::json!({}));
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn chat_returns_model_answer() {
        let provider = MockProvider::with_responses(vec!["Paris".into()]);
        let state = test_state(provider).await;
        let app = build_router(state, 1_048_576);

        let ingest = json_request(
            "/api/ingest",
            serde_json::json!({
                "documentId": "doc-1",
                "htmlContent": "<p>Paris is the capital of France.</p>"
            }),
        );
        let resp = app.clone().oneshot(ingest).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let chat = json_request(
            "/api/chat",
            serde_json::json!({"query": "What is the capital of France?"}),
        );
        let resp = app.oneshot(chat).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = response_json(resp).await;
        assert_eq!(json["answer"], "Paris");
    }

    #[tokio::test]
    async fn clear_resets_vector_count() {
        let state = test_state(MockProvider::default()).await;
        let store = state.store.clone();
        let app = build_router(state, 1_048_576);

        let ingest = json_request(
            "/api/ingest",
            serde_json::json!({
                "documentId": "doc-1",
                "htmlContent": "<p>one</p><p>two</p>"
            }),
        );
        app.clone().oneshot(ingest).await.unwrap();
        assert_eq!(store.point_count(COLLECTION).await.unwrap(), 2);

        let clear = Request::builder()
            .method("POST")
            .uri("/api/clear")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(clear).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = response_json(resp).await;
        assert_eq!(json["success"], true);
        assert_eq!(store.point_count(COLLECTION).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn parse_without_file_part_is_400() {
        let app = make_router(MockProvider::default()).await;
        let boundary = "X-DOCCHAT-BOUNDARY";
        let body = format!(
            "--{boundary}\r\ncontent-disposition: form-data; name=\"other\"\r\n\r\nvalue\r\n--{boundary}--\r\n"
        );
        let req = Request::builder()
            .method("POST")
            .uri("/api/parse")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = response_json(resp).await;
        assert!(json["error"].as_str().unwrap().contains("no file uploaded"));
    }

    #[tokio::test]
    async fn body_size_limit_enforced() {
        let state = test_state(MockProvider::default()).await;
        let app = build_router(state, 64);
        let oversized = vec![b'a'; 256];
        let req = Request::builder()
            .method("POST")
            .uri("/api/ingest")
            .header("content-type", "application/json")
            .body(Body::from(oversized))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
