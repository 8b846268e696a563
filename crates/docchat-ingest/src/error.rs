use docchat_llm::LlmError;
use docchat_store::VectorStoreError;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("no text content found in HTML")]
    NoContent,

    #[error("embedding failed: {0}")]
    Embedding(#[from] LlmError),

    #[error("storage failed: {0}")]
    Storage(#[from] VectorStoreError),
}
