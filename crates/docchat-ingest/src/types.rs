/// One unit of text extracted from a single HTML element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub text: String,
    pub tag: String,
}

/// Summary of a completed ingestion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestReport {
    pub chunks_processed: usize,
}
