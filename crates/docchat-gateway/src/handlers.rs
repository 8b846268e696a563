use axum::Json;
use axum::extract::{Multipart, State};
use axum::response::{Html, IntoResponse};

use docchat_ingest::{IngestError, IngestionPipeline};
use docchat_llm::LlmProvider;
use docchat_llm::provider::{Message, Role};

use crate::error::ApiError;
use crate::server::AppState;

const ANSWER_INSTRUCTION: &str = "Please provide the most accurate answer based only on the \
following context. If the answer isn't found in the context, respond with: \
\"The information is not present in the context.\"";

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IngestPayload {
    #[serde(default)]
    document_id: Option<String>,
    #[serde(default)]
    html_content: Option<String>,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IngestResponse {
    success: bool,
    chunks_processed: usize,
    index_stats: IndexStats,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IndexStats {
    vector_count: u64,
}

#[derive(serde::Deserialize)]
pub(crate) struct ChatPayload {
    #[serde(default)]
    query: Option<String>,
}

#[derive(serde::Serialize)]
pub(crate) struct ChatResponse {
    answer: String,
}

#[derive(serde::Serialize)]
pub(crate) struct ClearResponse {
    success: bool,
}

#[derive(serde::Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_secs: u64,
}

pub(crate) async fn ingest_handler(
    State(state): State<AppState>,
    Json(payload): Json<IngestPayload>,
) -> Result<Json<IngestResponse>, ApiError> {
    let (Some(document_id), Some(html)) = (payload.document_id, payload.html_content) else {
        return Err(ApiError::Validation(
            "missing required fields: documentId and htmlContent".into(),
        ));
    };
    if document_id.trim().is_empty() || html.trim().is_empty() {
        return Err(ApiError::Validation(
            "missing required fields: documentId and htmlContent".into(),
        ));
    }

    let pipeline = IngestionPipeline::new(
        state.provider.clone(),
        state.store.clone(),
        state.collection.clone(),
        state.batch_size,
    );

    let report = pipeline
        .ingest(&document_id, &html)
        .await
        .map_err(|e| match e {
            IngestError::NoContent => ApiError::Validation(e.to_string()),
            other => ApiError::upstream("failed to ingest document", other),
        })?;

    let vector_count = state
        .store
        .point_count(&state.collection)
        .await
        .map_err(|e| ApiError::upstream("failed to ingest document", e))?;

    Ok(Json(IngestResponse {
        success: true,
        chunks_processed: report.chunks_processed,
        index_stats: IndexStats { vector_count },
    }))
}

pub(crate) async fn chat_handler(
    State(state): State<AppState>,
    Json(payload): Json<ChatPayload>,
) -> Result<Json<ChatResponse>, ApiError> {
    let query = payload.query.unwrap_or_default();
    let query = query.trim();
    if query.is_empty() {
        return Err(ApiError::Validation("missing required field: query".into()));
    }

    let vector = state
        .provider
        .embed(query)
        .await
        .map_err(|e| ApiError::upstream("failed to generate query embedding", e))?;

    let matches = state
        .store
        .search(&state.collection, vector, state.top_k)
        .await
        .map_err(|e| ApiError::upstream("failed to process chat request", e))?;

    let context = matches
        .iter()
        .filter_map(|m| m.payload.get("text").and_then(|v| v.as_str()))
        .collect::<Vec<_>>()
        .join("\n\n");

    tracing::info!(hits = matches.len(), "retrieved context for query");

    let prompt = build_prompt(&context, query);
    let answer = state
        .provider
        .chat(&[Message::new(Role::User, prompt)])
        .await
        .map_err(|e| ApiError::upstream("failed to generate completion", e))?;

    Ok(Json(ChatResponse { answer }))
}

pub(crate) async fn parse_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("invalid multipart request: {e}")))?
    {
        if field.name() != Some("document") {
            continue;
        }
        let filename = field.file_name().unwrap_or("document.pdf").to_owned();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_owned();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::Validation(format!("invalid multipart request: {e}")))?;

        let payload = state
            .parser
            .parse(bytes.to_vec(), filename, content_type)
            .await
            .map_err(|e| ApiError::upstream("failed to parse document", e))?;
        return Ok(Json(payload));
    }

    Err(ApiError::Validation(
        "no file uploaded or invalid file".into(),
    ))
}

pub(crate) async fn clear_handler(
    State(state): State<AppState>,
) -> Result<Json<ClearResponse>, ApiError> {
    state
        .store
        .delete_collection(&state.collection)
        .await
        .map_err(|e| ApiError::upstream("failed to clear index", e))?;
    state
        .store
        .ensure_collection(&state.collection, state.vector_size)
        .await
        .map_err(|e| ApiError::upstream("failed to clear index", e))?;

    tracing::info!(collection = %state.collection, "vector index cleared");
    Ok(Json(ClearResponse { success: true }))
}

pub(crate) async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}

pub(crate) async fn chat_page() -> Html<&'static str> {
    Html(include_str!("../assets/chat.html"))
}

pub(crate) async fn upload_page() -> Html<&'static str> {
    Html(include_str!("../assets/upload.html"))
}

fn build_prompt(context: &str, query: &str) -> String {
    format!("{ANSWER_INSTRUCTION}\n\nContext: {context}\n\nQuestion: {query}")
}
