//! Vector index abstraction with Qdrant and in-memory backends.

pub mod in_memory;
pub mod qdrant;
pub mod vector_store;

pub use in_memory::InMemoryVectorStore;
pub use qdrant::QdrantStore;
pub use vector_store::{ScoredVectorPoint, VectorPoint, VectorStore, VectorStoreError};
