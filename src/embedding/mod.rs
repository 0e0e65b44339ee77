// Embedding boundary: local sentence embeddings for indexing and search.
//
// Components:
// - Embedder: the trait the pipelines depend on
// - CandleEmbedder: local BERT sentence-embedding engine via Candle
// - MockEmbedder: deterministic hash-based embedder for tests

pub mod engine;
pub mod mock;

// Re-export key types
pub use engine::CandleEmbedder;
pub use mock::MockEmbedder;

use crate::errors::Result;
use async_trait::async_trait;

/// Maps text to a fixed-length vector.
///
/// Deterministic for a fixed model: the same text must always produce
/// the same vector, or indexed content and queries drift apart.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed one text. Implementations reject empty input.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Vector length produced by this embedder.
    fn dimension(&self) -> usize;
}
