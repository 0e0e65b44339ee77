// Index store: the vector-database boundary.
//
// Components:
// - VectorStore: the trait the pipelines depend on
// - QdrantStore: Qdrant-backed implementation (gRPC)
// - MemoryStore: in-process implementation for tests

pub mod memory;
pub mod qdrant;

// Re-export key types
pub use memory::MemoryStore;
pub use qdrant::QdrantStore;

use crate::errors::Result;
use crate::types::{IndexedPoint, SearchHit};
use async_trait::async_trait;

/// One named vector collection with exact-match payload filtering.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Create the collection if absent; safe to call on every startup.
    async fn ensure_collection(&self, dimension: u64) -> Result<()>;

    /// Write a batch of points; points sharing an id are overwritten.
    async fn upsert(&self, points: Vec<IndexedPoint>) -> Result<()>;

    /// Top `limit` points by descending cosine similarity, restricted to
    /// points whose payload matches every `(field, value)` filter.
    async fn search(
        &self,
        vector: Vec<f32>,
        limit: usize,
        filters: Vec<(String, String)>,
    ) -> Result<Vec<SearchHit>>;

    /// Number of points currently stored.
    async fn count(&self) -> Result<u64>;
}
