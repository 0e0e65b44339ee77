//! Precedent - Decision Memory Engine
//!
//! Extracts structured decision records from free-form documents with an LLM,
//! normalizes the messy output into a strict schema, indexes each record in a
//! vector store, and answers natural-language queries with filtered semantic
//! search.
//!
//! # Architecture
//!
//! - **extraction**: prompt construction + response normalization
//! - **llm / embedding / store**: collaborator boundaries behind traits
//! - **pipeline**: ingestion and retrieval orchestration

// Core modules
pub mod cli;
pub mod config;
pub mod errors;
pub mod types;

// Collaborator boundaries
pub mod embedding;
pub mod llm;
pub mod store;

// Extraction and orchestration
pub mod extraction;
pub mod pipeline;

// Re-export commonly used types
pub use errors::{PrecedentError, Result};
pub use types::{DecisionRecord, SearchQuery, SearchResult};
