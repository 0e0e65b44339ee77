//! Groq chat-completions client
//!
//! Speaks the OpenAI-compatible `/chat/completions` endpoint. Requests
//! are sent at temperature zero because the response is parsed as JSON
//! downstream; sampling variety only hurts.

use crate::errors::{PrecedentError, Result};
use crate::llm::CompletionClient;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default API base for Groq's OpenAI-compatible endpoint
pub const DEFAULT_API_BASE: &str = "https://api.groq.com/openai/v1";

/// Default extraction model
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

// Extraction of a large document can legitimately take a while
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// HTTP client for an OpenAI-compatible completion service
#[derive(Debug, Clone)]
pub struct GroqClient {
    client: Client,
    api_base: String,
    api_key: String,
    model: String,
}

impl GroqClient {
    /// Create a new client for the given endpoint, key, and model.
    pub fn new(api_base: &str, api_key: &str, model: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(PrecedentError::HttpError)?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }

    /// Model identifier requests are sent with
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionClient for GroqClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.api_base);
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
            temperature: 0.0,
        };

        debug!(model = %self.model, prompt_chars = user.len(), "requesting completion");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                PrecedentError::CompletionError(format!("Failed to reach completion service: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(PrecedentError::CompletionError(format!(
                "Completion service returned {}: {}",
                status, body
            )));
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            PrecedentError::CompletionError(format!("Failed to parse completion response: {}", e))
        })?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| {
                PrecedentError::CompletionError("Completion response contained no choices".to_string())
            })
    }
}

/// Request body for the chat-completions endpoint
#[derive(Debug, Clone, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

/// One chat message, used in both requests and responses
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Response body, reduced to the fields the engine reads
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}
