//! Ingestion pipeline: document text in, indexed decisions out
//!
//! Extraction drives everything: the completion service turns raw text
//! into candidate records, the normalizer validates them, and each
//! survivor is embedded and upserted in one batch.

use crate::embedding::Embedder;
use crate::errors::{PrecedentError, Result};
use crate::extraction::{normalizer, prompt};
use crate::llm::CompletionClient;
use crate::store::VectorStore;
use crate::types::IndexedPoint;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// End-to-end ingestion over shared collaborator handles
pub struct IngestionPipeline {
    completion: Arc<dyn CompletionClient>,
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
}

impl IngestionPipeline {
    pub fn new(
        completion: Arc<dyn CompletionClient>,
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn VectorStore>,
    ) -> Self {
        Self {
            completion,
            embedder,
            store,
        }
    }

    /// Extract, embed, and index every decision found in `raw_text`.
    ///
    /// Returns the number of records stored. A document with no
    /// extractable decisions yields zero without error; so does a model
    /// response that is not JSON at all, since re-prompting is not the
    /// pipeline's call to make. Store and embedding failures propagate.
    pub async fn ingest(&self, raw_text: &str, filename: &str) -> Result<usize> {
        info!(file = filename, "extracting decisions");

        let response = self
            .completion
            .complete(prompt::SYSTEM_PROMPT, &prompt::extraction_prompt(raw_text))
            .await?;

        let records = match normalizer::normalize_response(&response, filename) {
            Ok(records) => records,
            Err(PrecedentError::ExtractionParseError(reason)) => {
                warn!(file = filename, %reason, "unparseable extraction response");
                return Ok(0);
            }
            Err(e) => return Err(e),
        };

        if records.is_empty() {
            warn!(file = filename, "no decisions found");
            return Ok(0);
        }

        let mut points = Vec::with_capacity(records.len());
        for record in &records {
            let embedding = self.embedder.embed(&record.embedding_content()).await?;
            points.push(IndexedPoint {
                id: Uuid::new_v4().to_string(),
                vector: embedding,
                payload: serde_json::to_value(record)?,
            });
        }

        let stored = points.len();
        self.store.upsert(points).await?;

        info!(file = filename, stored, "ingested decisions");
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::MockEmbedder;
    use crate::llm::MockCompletion;
    use crate::store::MemoryStore;

    fn pipeline_with(response: &str) -> (IngestionPipeline, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let pipeline = IngestionPipeline::new(
            Arc::new(MockCompletion::new(response)),
            Arc::new(MockEmbedder::new()),
            store.clone(),
        );
        (pipeline, store)
    }

    #[tokio::test]
    async fn test_ingest_stores_one_point_per_record() {
        let response = r#"[
            {
                "decision_title": "Use Groq",
                "decision_date": "2024-06-01",
                "team": "Engineering",
                "rationale": ["It is fast."],
                "alternatives": []
            },
            {
                "decision_title": "Adopt Kafka",
                "decision_date": "2024-06-02",
                "team": "Data",
                "rationale": ["Replay mattered for backfills."],
                "alternatives": []
            }
        ]"#;
        let (pipeline, store) = pipeline_with(response);

        let stored = pipeline.ingest("raw meeting notes", "notes.txt").await.unwrap();
        assert_eq!(stored, 2);
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_empty_object_response_stores_nothing() {
        let (pipeline, store) = pipeline_with("{}");

        let stored = pipeline.ingest("raw text", "empty.txt").await.unwrap();
        assert_eq!(stored, 0);
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unparseable_response_stores_nothing_without_error() {
        let (pipeline, store) = pipeline_with("I could not find any decisions, sorry!");

        let stored = pipeline.ingest("raw text", "prose.txt").await.unwrap();
        assert_eq!(stored, 0);
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_points_get_unique_ids() {
        let response = r#"[
            {
                "decision_title": "One",
                "decision_date": "2024-01-01",
                "team": "Engineering",
                "rationale": ["First reason."],
                "alternatives": []
            },
            {
                "decision_title": "Two",
                "decision_date": "2024-01-02",
                "team": "Engineering",
                "rationale": ["Second reason."],
                "alternatives": []
            }
        ]"#;
        let (pipeline, store) = pipeline_with(response);
        pipeline.ingest("raw", "n.txt").await.unwrap();

        let hits = store.search(vec![0.0; 384], 10, vec![]).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_ne!(hits[0].id, hits[1].id);
    }
}
