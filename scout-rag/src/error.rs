//! Error types for the `scout-rag` crate.

use scout_core::ModelError;
use thiserror::Error;

/// Errors that can occur in retrieval operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    EmbeddingError {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the vector store backend.
    #[error("Vector store error ({backend}): {message}")]
    VectorStoreError {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The retrieval store was never initialized, failed to initialize, or was closed.
    #[error("Retrieval store is not initialized")]
    StoreUnavailable,

    /// Filesystem failure while loading or persisting data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The chat model call made while answering failed.
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// A convenience result type for retrieval operations.
pub type Result<T> = std::result::Result<T, RagError>;
