//! In-process index store for tests
//!
//! Linear-scan cosine search over a vector of points. Matches the
//! contract of the real store closely enough to exercise the pipelines:
//! descending score order, limit, ANDed exact-match payload filters,
//! upsert-by-id overwrite.

use crate::errors::Result;
use crate::store::VectorStore;
use crate::types::{IndexedPoint, SearchHit};
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// Vector store held entirely in memory
#[derive(Default)]
pub struct MemoryStore {
    points: RwLock<Vec<IndexedPoint>>,
    ensure_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times the collection has been ensured (for idempotence tests)
    pub fn ensure_calls(&self) -> usize {
        self.ensure_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VectorStore for MemoryStore {
    async fn ensure_collection(&self, _dimension: u64) -> Result<()> {
        self.ensure_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn upsert(&self, new_points: Vec<IndexedPoint>) -> Result<()> {
        let mut points = self.points.write().await;
        for point in new_points {
            match points.iter_mut().find(|p| p.id == point.id) {
                Some(existing) => *existing = point,
                None => points.push(point),
            }
        }
        Ok(())
    }

    async fn search(
        &self,
        vector: Vec<f32>,
        limit: usize,
        filters: Vec<(String, String)>,
    ) -> Result<Vec<SearchHit>> {
        let points = self.points.read().await;

        let mut hits: Vec<SearchHit> = points
            .iter()
            .filter(|point| matches_filters(&point.payload, &filters))
            .map(|point| SearchHit {
                id: point.id.clone(),
                score: cosine_similarity(&vector, &point.vector),
                payload: point.payload.clone(),
            })
            .collect();

        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(limit);
        Ok(hits)
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.points.read().await.len() as u64)
    }
}

fn matches_filters(payload: &JsonValue, filters: &[(String, String)]) -> bool {
    filters.iter().all(|(field, expected)| {
        payload.get(field).and_then(JsonValue::as_str) == Some(expected.as_str())
    })
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(id: &str, vector: Vec<f32>, team: &str) -> IndexedPoint {
        IndexedPoint {
            id: id.to_string(),
            vector,
            payload: serde_json::json!({"team": team, "decision_title": id}),
        }
    }

    #[tokio::test]
    async fn test_ensure_collection_is_idempotent() {
        let store = MemoryStore::new();
        store.ensure_collection(384).await.unwrap();
        store.ensure_collection(384).await.unwrap();
        assert_eq!(store.ensure_calls(), 2);
    }

    #[tokio::test]
    async fn test_search_orders_by_descending_score() {
        let store = MemoryStore::new();
        store
            .upsert(vec![
                point("far", vec![0.0, 1.0], "Engineering"),
                point("near", vec![1.0, 0.0], "Engineering"),
                point("mid", vec![1.0, 1.0], "Engineering"),
            ])
            .await
            .unwrap();

        let hits = store.search(vec![1.0, 0.0], 10, vec![]).await.unwrap();
        let ids: Vec<&str> = hits.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "mid", "far"]);
        assert!((hits[0].score - 1.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_search_applies_limit() {
        let store = MemoryStore::new();
        store
            .upsert(vec![
                point("a", vec![1.0, 0.0], "Engineering"),
                point("b", vec![0.9, 0.1], "Engineering"),
                point("c", vec![0.8, 0.2], "Engineering"),
            ])
            .await
            .unwrap();

        let hits = store.search(vec![1.0, 0.0], 2, vec![]).await.unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn test_filters_are_anded_exact_matches() {
        let store = MemoryStore::new();
        store
            .upsert(vec![
                point("eng", vec![1.0, 0.0], "Engineering"),
                point("prod", vec![1.0, 0.0], "Product"),
            ])
            .await
            .unwrap();

        let hits = store
            .search(
                vec![1.0, 0.0],
                10,
                vec![("team".to_string(), "Engineering".to_string())],
            )
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "eng");

        let none = store
            .search(
                vec![1.0, 0.0],
                10,
                vec![
                    ("team".to_string(), "Engineering".to_string()),
                    ("decision_title".to_string(), "prod".to_string()),
                ],
            )
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_upsert_overwrites_matching_id() {
        let store = MemoryStore::new();
        store
            .upsert(vec![point("same", vec![1.0, 0.0], "Engineering")])
            .await
            .unwrap();
        store
            .upsert(vec![point("same", vec![0.0, 1.0], "Product")])
            .await
            .unwrap();

        assert_eq!(store.count().await.unwrap(), 1);
        let hits = store.search(vec![0.0, 1.0], 1, vec![]).await.unwrap();
        assert_eq!(hits[0].payload["team"], "Product");
    }

    #[tokio::test]
    async fn test_zero_vector_scores_zero_not_nan() {
        let store = MemoryStore::new();
        store
            .upsert(vec![point("zero", vec![0.0, 0.0], "Engineering")])
            .await
            .unwrap();

        let hits = store.search(vec![1.0, 0.0], 1, vec![]).await.unwrap();
        assert_eq!(hits[0].score, 0.0);
    }
}
