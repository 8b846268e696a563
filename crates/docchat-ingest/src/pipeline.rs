//! Extract → embed → upsert pipeline over a vector store.

use std::collections::HashMap;
use std::sync::Arc;

use docchat_llm::LlmProvider;
use docchat_store::{VectorPoint, VectorStore};
use uuid::Uuid;

use crate::error::IngestError;
use crate::extract::extract_chunks;
use crate::types::IngestReport;

pub struct IngestionPipeline<P> {
    provider: P,
    store: Arc<dyn VectorStore>,
    collection: String,
    batch_size: usize,
}

/// Deterministic point id for a chunk, derived from the document id and the
/// chunk's position. Re-ingesting a document therefore overwrites its prior
/// vectors instead of accumulating duplicates.
#[must_use]
pub fn point_id(document_id: &str, chunk_index: usize) -> String {
    Uuid::new_v5(
        &Uuid::NAMESPACE_OID,
        format!("{document_id}:{chunk_index}").as_bytes(),
    )
    .to_string()
}

impl<P: LlmProvider> IngestionPipeline<P> {
    #[must_use]
    pub fn new(
        provider: P,
        store: Arc<dyn VectorStore>,
        collection: impl Into<String>,
        batch_size: usize,
    ) -> Self {
        Self {
            provider,
            store,
            collection: collection.into(),
            batch_size: batch_size.max(1),
        }
    }

    /// Ingest one HTML document: extract chunks, embed them in sequential
    /// batches, and upsert the resulting points.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::NoContent`] when no qualifying chunks remain
    /// (nothing is embedded or stored in that case), or the underlying
    /// embedding/storage error. A failure mid-run leaves earlier batches
    /// committed.
    pub async fn ingest(
        &self,
        document_id: &str,
        html: &str,
    ) -> Result<IngestReport, IngestError> {
        let chunks = extract_chunks(html);
        if chunks.is_empty() {
            return Err(IngestError::NoContent);
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let mut embeddings = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.batch_size) {
            let vectors = self.provider.embed_batch(batch).await?;
            embeddings.extend(vectors);
        }

        let timestamp = chrono::Utc::now().to_rfc3339();
        let points: Vec<VectorPoint> = chunks
            .iter()
            .zip(embeddings)
            .enumerate()
            .map(|(idx, (chunk, vector))| VectorPoint {
                id: point_id(document_id, idx),
                vector,
                payload: HashMap::from([
                    ("text".to_owned(), serde_json::json!(chunk.text)),
                    ("tag".to_owned(), serde_json::json!(chunk.tag)),
                    ("document_id".to_owned(), serde_json::json!(document_id)),
                    ("chunk_index".to_owned(), serde_json::json!(idx)),
                    ("timestamp".to_owned(), serde_json::json!(timestamp)),
                ]),
            })
            .collect();

        for batch in points.chunks(self.batch_size) {
            self.store.upsert(&self.collection, batch.to_vec()).await?;
        }

        tracing::info!(
            document_id,
            chunks = chunks.len(),
            collection = %self.collection,
            "document ingested"
        );

        Ok(IngestReport {
            chunks_processed: chunks.len(),
        })
    }
}
