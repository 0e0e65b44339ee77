//! Core data types for decision memory
//!
//! Defines the decision record schema shared by extraction, indexing,
//! and retrieval, plus the search request/response types.

use crate::errors::{PrecedentError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A single extracted decision, the unit stored in the vector index.
///
/// Serializes with the wire field names `decision_title` and
/// `decision_date`; deserialization also accepts the short forms
/// `title` and `date` that models occasionally emit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DecisionRecord {
    /// The decision that was made
    #[serde(rename = "decision_title", alias = "title")]
    pub title: String,

    /// When it was made, as written in the source document (free-form)
    #[serde(rename = "decision_date", alias = "date")]
    pub date: String,

    /// Team responsible for the decision
    pub team: String,

    /// Why the decision was made, one entry per point
    pub rationale: Vec<String>,

    /// Options considered and rejected
    pub alternatives: Vec<String>,

    /// Final result or action item, when the document states one
    #[serde(default)]
    pub outcome: Option<String>,

    /// Free-form labels; duplicates and order are preserved as extracted
    #[serde(default)]
    pub tags: Vec<String>,

    /// Name of the document this record was extracted from
    pub source_file: String,
}

impl DecisionRecord {
    /// Text embedded for similarity search: title plus the full rationale.
    pub fn embedding_content(&self) -> String {
        format!("{}: {}", self.title, self.joined_rationale())
    }

    /// Rationale points joined into one passage.
    pub fn joined_rationale(&self) -> String {
        self.rationale.join(" ")
    }

    /// Check the required-field rules a record must satisfy before indexing.
    ///
    /// Title, team, and source file must be non-blank; rationale must
    /// contain at least one non-blank entry. The date is required to be
    /// present but its content is not checked, since source documents
    /// write dates in every imaginable form.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(PrecedentError::ValidationError(
                "missing or empty decision title".to_string(),
            ));
        }
        if self.team.trim().is_empty() {
            return Err(PrecedentError::ValidationError(format!(
                "record '{}' has no team",
                self.title
            )));
        }
        if self.rationale.iter().all(|point| point.trim().is_empty()) {
            return Err(PrecedentError::ValidationError(format!(
                "record '{}' has no rationale content",
                self.title
            )));
        }
        if self.source_file.trim().is_empty() {
            return Err(PrecedentError::ValidationError(format!(
                "record '{}' has no source file",
                self.title
            )));
        }
        Ok(())
    }
}

/// A point ready for upsert into the vector store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedPoint {
    /// Stable identifier, a UUID string minted at ingestion
    pub id: String,
    /// Embedding vector
    pub vector: Vec<f32>,
    /// Full decision record as a JSON object
    pub payload: JsonValue,
}

/// A raw similarity hit returned by the vector store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: String,
    pub score: f32,
    pub payload: JsonValue,
}

/// A natural-language search request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Query text, embedded verbatim
    pub query: String,

    /// Restrict results to decisions owned by this team
    #[serde(default)]
    pub filter_team: Option<String>,

    /// Accepted but not applied; decision dates are free-form strings,
    /// so there is no numeric field to filter on yet
    #[serde(default)]
    pub filter_year: Option<i32>,

    /// Maximum number of hits requested from the store
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    5
}

impl SearchQuery {
    /// Query with the default limit and no filters.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            filter_team: None,
            filter_year: None,
            limit: default_limit(),
        }
    }
}

/// A retrieval result that passed the relevance floor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Cosine similarity reported by the store
    pub score: f32,
    /// The stored decision record
    pub decision: DecisionRecord,
    /// Rationale joined into one passage, ready for display or prompting
    pub context: String,
}
