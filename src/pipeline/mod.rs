// Pipeline orchestration: ingestion and retrieval over the collaborator
// boundaries (completion, embedding, store).
//
// Components:
// - IngestionPipeline: extract decisions from a document and index them
// - RetrievalPipeline: embed a query, search, gate on the relevance floor

pub mod ingestion;
pub mod retrieval;

// Re-export key types
pub use ingestion::IngestionPipeline;
pub use retrieval::{RetrievalPipeline, RELEVANCE_FLOOR};
