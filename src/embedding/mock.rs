//! Deterministic embedder for tests
//!
//! Hashes each lowercased alphanumeric token to one of the vector
//! dimensions and counts occurrences, then L2-normalizes. Cosine
//! similarity between two texts therefore tracks token overlap: shared
//! words score high, disjoint texts score near zero, identical texts
//! score one. That is enough signal to exercise the relevance floor and
//! ranking behavior without downloading a model.

use crate::embedding::Embedder;
use crate::errors::{PrecedentError, Result};
use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Vector length, matching the default real model
pub const MOCK_DIMENSION: usize = 384;

/// Hash-based bag-of-words embedder
#[derive(Debug, Clone, Default)]
pub struct MockEmbedder;

impl MockEmbedder {
    pub fn new() -> Self {
        Self
    }

    fn token_vector(text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; MOCK_DIMENSION];
        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let mut hasher = DefaultHasher::new();
            token.to_lowercase().hash(&mut hasher);
            let dim = (hasher.finish() % MOCK_DIMENSION as u64) as usize;
            vector[dim] += 1.0;
        }

        let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(PrecedentError::EmbeddingError(
                "Cannot embed empty text".to_string(),
            ));
        }
        Ok(Self::token_vector(text))
    }

    fn dimension(&self) -> usize {
        MOCK_DIMENSION
    }
}
