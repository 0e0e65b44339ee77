//! Configuration management for the precedent engine
//!
//! Provides TOML-based configuration with defaults and validation.
//! Location: ~/.precedent/config.toml
//!
//! Secrets and endpoints can be overridden through the environment:
//! `GROQ_API_KEY`, `QDRANT_URL`, and `QDRANT_API_KEY`.

use crate::errors::{PrecedentError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Complete configuration for the engine
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub llm: LlmConfig,
    pub qdrant: QdrantConfig,
    pub embedding: EmbeddingConfig,
}

/// Completion service configuration (OpenAI-compatible endpoint)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub api_base: String,
    pub api_key: Option<String>,
    pub model: String,
}

/// Vector store connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QdrantConfig {
    /// gRPC endpoint
    pub url: String,
    pub api_key: Option<String>,
    pub collection: String,
}

/// Embedding model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Hugging Face model id to download on first use
    pub model_id: String,
    pub dimension: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.groq.com/openai/v1".to_string(),
            api_key: None,
            model: "llama-3.3-70b-versatile".to_string(),
        }
    }
}

impl Default for QdrantConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:6334".to_string(),
            api_key: None,
            collection: "institutional_memory".to_string(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model_id: "sentence-transformers/all-MiniLM-L6-v2".to_string(),
            dimension: 384,
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults, then apply
    /// environment overrides
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let mut config = if let Some(config_path) = path {
            Self::load_from_file(&config_path)?
        } else {
            Self::load_default()?
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| PrecedentError::ConfigError(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| PrecedentError::ConfigError(format!("Failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Load configuration from the standard location, falling back to
    /// built-in defaults when no file exists
    pub fn load_default() -> Result<Self> {
        let config_path = Self::config_path()?;
        if config_path.exists() {
            return Self::load_from_file(&config_path);
        }

        Ok(Config::default())
    }

    /// Standard configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| {
            PrecedentError::ConfigError("Could not determine home directory".to_string())
        })?;

        Ok(home.join(".precedent").join("config.toml"))
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| PrecedentError::ConfigError(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                PrecedentError::ConfigError(format!("Failed to create config dir: {}", e))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| PrecedentError::ConfigError(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.qdrant.url.trim().is_empty() {
            return Err(PrecedentError::ConfigError(
                "qdrant.url must not be empty".to_string(),
            ));
        }

        if self.qdrant.collection.trim().is_empty() {
            return Err(PrecedentError::ConfigError(
                "qdrant.collection must not be empty".to_string(),
            ));
        }

        if self.llm.api_base.trim().is_empty() {
            return Err(PrecedentError::ConfigError(
                "llm.api_base must not be empty".to_string(),
            ));
        }

        if self.embedding.dimension == 0 {
            return Err(PrecedentError::ConfigError(
                "embedding.dimension must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Apply environment variable overrides for secrets and endpoints
    fn apply_env_overrides(&mut self) {
        if let Some(key) = non_empty_env("GROQ_API_KEY") {
            self.llm.api_key = Some(key);
        }
        if let Some(url) = non_empty_env("QDRANT_URL") {
            self.qdrant.url = url;
        }
        if let Some(key) = non_empty_env("QDRANT_API_KEY") {
            self.qdrant.api_key = Some(key);
        }
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();

        assert_eq!(config.qdrant.url, "http://localhost:6334");
        assert_eq!(config.qdrant.collection, "institutional_memory");
        assert_eq!(config.llm.model, "llama-3.3-70b-versatile");
        assert_eq!(
            config.embedding.model_id,
            "sentence-transformers/all-MiniLM-L6-v2"
        );
        assert_eq!(config.embedding.dimension, 384);
        assert!(config.llm.api_key.is_none());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.embedding.dimension = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_config_parses_with_defaults() {
        let config: Config = toml::from_str(
            r#"
            [qdrant]
            url = "http://qdrant.internal:6334"
            "#,
        )
        .unwrap();

        assert_eq!(config.qdrant.url, "http://qdrant.internal:6334");
        // Untouched sections keep their defaults
        assert_eq!(config.qdrant.collection, "institutional_memory");
        assert_eq!(config.llm.model, "llama-3.3-70b-versatile");
    }

    #[test]
    fn test_config_save_and_reload() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.llm.api_key = Some("gsk_test".to_string());
        config.qdrant.collection = "team_decisions".to_string();
        config.save(&path).unwrap();

        let reloaded = Config::load_from_file(&path).unwrap();
        assert_eq!(reloaded.llm.api_key.as_deref(), Some("gsk_test"));
        assert_eq!(reloaded.qdrant.collection, "team_decisions");
    }

    #[test]
    fn test_env_overrides() {
        std::env::set_var("QDRANT_URL", "http://override:6334");

        let mut config = Config::default();
        config.apply_env_overrides();
        assert_eq!(config.qdrant.url, "http://override:6334");

        std::env::remove_var("QDRANT_URL");
    }
}
