//! Local sentence-embedding engine via Candle
//!
//! Downloads a BERT sentence-transformer from the Hugging Face Hub on
//! first use and runs it on CPU. Embeddings are masked-mean pooled over
//! the token dimension and L2-normalized, matching the model's own
//! pooling pipeline, so cosine scores agree with reference output.

use crate::embedding::Embedder;
use crate::errors::{PrecedentError, Result};
use async_trait::async_trait;
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config};
use hf_hub::{api::sync::Api, Repo, RepoType};
use serde::Deserialize;
use std::sync::Arc;
use tokenizers::{Tokenizer, TruncationParams};
use tracing::info;

/// Default sentence-embedding model (384 dimensions)
pub const DEFAULT_MODEL_ID: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Subset of the model config the engine reads directly
#[derive(Debug, Deserialize)]
struct ModelDims {
    hidden_size: usize,
}

/// Sentence-embedding engine backed by a local BERT model
#[derive(Clone)]
pub struct CandleEmbedder {
    model: Arc<BertModel>,
    tokenizer: Arc<Tokenizer>,
    device: Device,
    dimension: usize,
}

impl CandleEmbedder {
    /// Create a new engine, downloading the model on first use.
    pub fn load(model_id: &str) -> Result<Self> {
        let device = Device::Cpu;

        let api = Api::new().map_err(|e| {
            PrecedentError::EmbeddingError(format!("Failed to create Hugging Face API client: {}", e))
        })?;
        let repo = api.repo(Repo::new(model_id.to_string(), RepoType::Model));

        let config_path = repo.get("config.json").map_err(|e| {
            PrecedentError::EmbeddingError(format!("Failed to download model config: {}", e))
        })?;
        let tokenizer_path = repo.get("tokenizer.json").map_err(|e| {
            PrecedentError::EmbeddingError(format!("Failed to download tokenizer: {}", e))
        })?;
        let weights_path = repo.get("model.safetensors").map_err(|e| {
            PrecedentError::EmbeddingError(format!("Failed to download model weights: {}", e))
        })?;

        let config_contents = std::fs::read_to_string(config_path)?;
        let config: Config = serde_json::from_str(&config_contents)?;
        let dims: ModelDims = serde_json::from_str(&config_contents)?;

        let mut tokenizer = Tokenizer::from_file(tokenizer_path).map_err(|e| {
            PrecedentError::EmbeddingError(format!("Failed to load tokenizer: {}", e))
        })?;
        // BERT position embeddings cap the sequence length; long rationale
        // passages must be cut, not rejected
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: 512,
                ..Default::default()
            }))
            .map_err(|e| {
                PrecedentError::EmbeddingError(format!("Failed to configure truncation: {}", e))
            })?;

        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, &device).map_err(
                |e| PrecedentError::EmbeddingError(format!("Failed to load model weights: {}", e)),
            )?
        };
        let model = BertModel::load(vb, &config).map_err(|e| {
            PrecedentError::EmbeddingError(format!("Failed to build BERT model: {}", e))
        })?;

        info!(model = model_id, dimension = dims.hidden_size, "embedding model ready");

        Ok(Self {
            model: Arc::new(model),
            tokenizer: Arc::new(tokenizer),
            device,
            dimension: dims.hidden_size,
        })
    }

    /// Synchronous embedding; the async trait wraps this in a blocking task.
    fn embed_sync(&self, text: &str) -> Result<Vec<f32>> {
        let encoding = self.tokenizer.encode(text, true).map_err(|e| {
            PrecedentError::EmbeddingError(format!("Tokenization failed: {}", e))
        })?;

        let token_ids = encoding.get_ids().to_vec();
        let mask = encoding.get_attention_mask().to_vec();
        let seq_len = token_ids.len();

        let token_ids =
            Tensor::from_vec(token_ids, (1, seq_len), &self.device).map_err(embed_err)?;
        let attention_mask =
            Tensor::from_vec(mask, (1, seq_len), &self.device).map_err(embed_err)?;
        let token_type_ids = token_ids.zeros_like().map_err(embed_err)?;

        let hidden = self
            .model
            .forward(&token_ids, &token_type_ids, Some(&attention_mask))
            .map_err(embed_err)?;

        let pooled = mean_pool(&hidden, &attention_mask).map_err(embed_err)?;
        let normalized = l2_normalize(&pooled).map_err(embed_err)?;

        let mut rows = normalized.to_vec2::<f32>().map_err(embed_err)?;
        rows.pop()
            .ok_or_else(|| PrecedentError::EmbeddingError("Model produced no embedding".to_string()))
    }
}

#[async_trait]
impl Embedder for CandleEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(PrecedentError::EmbeddingError(
                "Cannot embed empty text".to_string(),
            ));
        }

        let engine = self.clone();
        let text = text.to_string();
        tokio::task::spawn_blocking(move || engine.embed_sync(&text))
            .await
            .map_err(|e| PrecedentError::EmbeddingError(format!("Embedding task failed: {}", e)))?
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Mean pooling over the token dimension, weighted by the attention mask
fn mean_pool(hidden: &Tensor, attention_mask: &Tensor) -> candle_core::Result<Tensor> {
    let mask_expanded = attention_mask
        .unsqueeze(2)?
        .expand(hidden.shape())?
        .to_dtype(hidden.dtype())?;

    let sum_hidden = (hidden * &mask_expanded)?.sum(1)?;
    let sum_mask = mask_expanded.sum(1)?.clamp(1e-9, f64::MAX)?;

    sum_hidden.broadcast_div(&sum_mask)
}

/// Scale each row to unit length
fn l2_normalize(embeddings: &Tensor) -> candle_core::Result<Tensor> {
    embeddings.broadcast_div(&embeddings.sqr()?.sum_keepdim(1)?.sqrt()?)
}

fn embed_err(e: candle_core::Error) -> PrecedentError {
    PrecedentError::EmbeddingError(e.to_string())
}
