//! HTML chunk extraction and the embed-then-upsert ingestion pipeline.

pub mod error;
pub mod extract;
pub mod pipeline;
pub mod types;

pub use error::IngestError;
pub use extract::extract_chunks;
pub use pipeline::{IngestionPipeline, point_id};
pub use types::{Chunk, IngestReport};
