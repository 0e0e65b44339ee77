//! Canned completion client for tests
//!
//! Returns a fixed response regardless of the prompt, so extraction
//! behavior can be exercised without a network call.

use crate::errors::Result;
use crate::llm::CompletionClient;
use async_trait::async_trait;

/// Completion client that always returns the same response
#[derive(Debug, Clone)]
pub struct MockCompletion {
    response: String,
}

impl MockCompletion {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

#[async_trait]
impl CompletionClient for MockCompletion {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String> {
        Ok(self.response.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_returns_canned_response() {
        let mock = MockCompletion::new("[]");
        let response = tokio_test::block_on(mock.complete("system", "user")).unwrap();
        assert_eq!(response, "[]");
    }
}
