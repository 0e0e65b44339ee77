//! Error types for the precedent engine
//!
//! One variant per failure boundary: extraction parsing, record
//! validation, the completion service, embedding, and the vector store.

use thiserror::Error;

/// Main error type for the precedent engine
#[derive(Error, Debug)]
pub enum PrecedentError {
    /// Model output was not parseable JSON after fence stripping
    #[error("Extraction parse error: {0}")]
    ExtractionParseError(String),

    /// A normalized record failed required-field validation
    #[error("Record validation failed: {0}")]
    ValidationError(String),

    /// Completion service errors (unreachable, non-success status, bad body)
    #[error("Completion error: {0}")]
    CompletionError(String),

    /// Embedding model errors
    #[error("Embedding error: {0}")]
    EmbeddingError(String),

    /// Vector store errors
    #[error("Vector store error: {0}")]
    StoreError(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, PrecedentError>;

/// Convert qdrant client errors at the store boundary
impl From<qdrant_client::QdrantError> for PrecedentError {
    fn from(err: qdrant_client::QdrantError) -> Self {
        PrecedentError::StoreError(err.to_string())
    }
}
