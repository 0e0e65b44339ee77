//! Retrieval pipeline: natural-language query in, relevant decisions out
//!
//! Embeds the query, searches the store with whatever exact-match
//! filters the caller supplied, then gates hits on a fixed relevance
//! floor before reassembling decision records from stored payloads.

use crate::embedding::Embedder;
use crate::errors::Result;
use crate::store::VectorStore;
use crate::types::{DecisionRecord, SearchHit, SearchQuery, SearchResult};
use std::sync::Arc;
use tracing::{debug, warn};

/// Hits scoring strictly below this cosine similarity are discarded as
/// noise. A hit at exactly the floor is kept.
pub const RELEVANCE_FLOOR: f32 = 0.35;

/// End-to-end retrieval over shared collaborator handles
pub struct RetrievalPipeline {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
}

impl RetrievalPipeline {
    pub fn new(embedder: Arc<dyn Embedder>, store: Arc<dyn VectorStore>) -> Self {
        Self { embedder, store }
    }

    /// Run one search. Returning fewer than `limit` results is the
    /// common case once the relevance floor is applied; no matches is
    /// an empty vector, never an error.
    pub async fn retrieve(&self, query: &SearchQuery) -> Result<Vec<SearchResult>> {
        let vector = self.embedder.embed(&query.query).await?;
        let filters = build_filters(query);

        debug!(
            limit = query.limit,
            filters = filters.len(),
            "searching decision index"
        );
        let hits = self.store.search(vector, query.limit, filters).await?;

        Ok(assemble_results(hits))
    }
}

// TODO: wire filter_year into the predicate once records carry a numeric
// year field; decision_date is free-form text, so there is nothing to
// match against yet.
fn build_filters(query: &SearchQuery) -> Vec<(String, String)> {
    let mut filters = Vec::new();
    if let Some(team) = &query.filter_team {
        filters.push(("team".to_string(), team.clone()));
    }
    filters
}

/// Apply the relevance floor and rebuild records from payloads,
/// preserving the store's descending-score order.
fn assemble_results(hits: Vec<SearchHit>) -> Vec<SearchResult> {
    let mut results = Vec::with_capacity(hits.len());

    for hit in hits {
        if hit.score < RELEVANCE_FLOOR {
            debug!(id = %hit.id, score = hit.score, "hit below relevance floor");
            continue;
        }

        let decision: DecisionRecord = match serde_json::from_value(hit.payload) {
            Ok(record) => record,
            Err(e) => {
                warn!(id = %hit.id, error = %e, "stored payload is not a decision record");
                continue;
            }
        };

        let context = decision.joined_rationale();
        results.push(SearchResult {
            score: hit.score,
            decision,
            context,
        });
    }

    results
}
