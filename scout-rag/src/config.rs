//! Configuration for the retrieval store, indexer and responder.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// Default on-disk location of the retrieval store.
pub const DEFAULT_PERSIST_DIRECTORY: &str = "developer_assistant_vectorstore";

/// Default collection name inside the persist directory.
pub const DEFAULT_COLLECTION: &str = "developer_assistant";

/// Configuration parameters for retrieval.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RagConfig {
    /// Maximum chunk size in characters.
    pub chunk_size: usize,
    /// Number of overlapping characters between consecutive chunks.
    pub chunk_overlap: usize,
    /// Number of nearest chunks returned by a query.
    pub top_k: usize,
    /// Directory the store persists to. Its presence means "load", its absence "create".
    pub persist_directory: PathBuf,
    /// Name of the collection inside the store.
    pub collection: String,
    /// Attempts made to create a new store before giving up.
    pub retry_attempts: u32,
    /// Pause between creation attempts, in milliseconds.
    pub retry_delay_ms: u64,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
            top_k: 5,
            persist_directory: PathBuf::from(DEFAULT_PERSIST_DIRECTORY),
            collection: DEFAULT_COLLECTION.to_string(),
            retry_attempts: 3,
            retry_delay_ms: 2000,
        }
    }
}

impl RagConfig {
    /// Create a new builder for constructing a [`RagConfig`].
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::default()
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

/// Builder for constructing a validated [`RagConfig`].
#[derive(Debug, Clone, Default)]
pub struct RagConfigBuilder {
    config: RagConfig,
}

impl RagConfigBuilder {
    /// Set the maximum chunk size in characters.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Set the overlap between consecutive chunks in characters.
    pub fn chunk_overlap(mut self, overlap: usize) -> Self {
        self.config.chunk_overlap = overlap;
        self
    }

    /// Set the number of results returned by a query.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    pub fn persist_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.config.persist_directory = directory.into();
        self
    }

    pub fn collection(mut self, name: impl Into<String>) -> Self {
        self.config.collection = name.into();
        self
    }

    pub fn retry_attempts(mut self, attempts: u32) -> Self {
        self.config.retry_attempts = attempts;
        self
    }

    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.config.retry_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Build the [`RagConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if:
    /// - `chunk_overlap >= chunk_size`
    /// - `top_k == 0`
    /// - `retry_attempts == 0`
    /// - the collection name is empty or contains characters other than
    ///   ASCII letters, digits, `_` and `-`
    pub fn build(self) -> Result<RagConfig> {
        let config = self.config;
        if config.chunk_overlap >= config.chunk_size {
            return Err(RagError::ConfigError(format!(
                "chunk_overlap ({}) must be less than chunk_size ({})",
                config.chunk_overlap, config.chunk_size
            )));
        }
        if config.top_k == 0 {
            return Err(RagError::ConfigError("top_k must be greater than zero".to_string()));
        }
        if config.retry_attempts == 0 {
            return Err(RagError::ConfigError(
                "retry_attempts must be greater than zero".to_string(),
            ));
        }
        let valid_name = !config.collection.is_empty()
            && config.collection.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid_name {
            return Err(RagError::ConfigError(format!(
                "invalid collection name '{}'",
                config.collection
            )));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_indexing_contract() {
        let config = RagConfig::default();
        assert_eq!(config.chunk_size, 1000);
        assert_eq!(config.chunk_overlap, 200);
        assert_eq!(config.top_k, 5);
        assert_eq!(config.retry_attempts, 3);
        assert_eq!(config.retry_delay(), Duration::from_secs(2));
    }

    #[test]
    fn test_builder_rejects_inconsistent_values() {
        assert!(RagConfig::builder().chunk_size(100).chunk_overlap(100).build().is_err());
        assert!(RagConfig::builder().top_k(0).build().is_err());
        assert!(RagConfig::builder().retry_attempts(0).build().is_err());
        assert!(RagConfig::builder().collection("../escape").build().is_err());
        assert!(RagConfig::builder().collection("").build().is_err());
    }

    #[test]
    fn test_builder_accepts_overrides() {
        let config = RagConfig::builder()
            .chunk_size(300)
            .chunk_overlap(50)
            .top_k(3)
            .collection("docs")
            .retry_delay(Duration::from_millis(5))
            .build()
            .unwrap();
        assert_eq!(config.chunk_size, 300);
        assert_eq!(config.collection, "docs");
        assert_eq!(config.retry_delay_ms, 5);
    }
}
