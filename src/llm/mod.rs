// Language-model completion boundary.
//
// Components:
// - CompletionClient: the trait the pipelines depend on
// - GroqClient: OpenAI-compatible chat-completions implementation
// - MockCompletion: canned responses for tests

pub mod client;
pub mod mock;

// Re-export key types
pub use client::GroqClient;
pub use mock::MockCompletion;

use crate::errors::Result;
use async_trait::async_trait;

/// A completion service that turns a prompt into one text response.
///
/// Implementations are expected to be deterministic-leaning (temperature
/// zero) since the output is parsed, not displayed.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Request a single completion for a system/user message pair.
    async fn complete(&self, system: &str, user: &str) -> Result<String>;
}
