//! Error types for the `scout-router` crate.

use scout_core::{ModelError, ToolError};
use scout_rag::RagError;
use thiserror::Error;

/// A turn that could not produce a reply.
#[derive(Debug, Error)]
pub enum RouterError {
    #[error("model call failed: {0}")]
    Model(#[from] ModelError),

    #[error("tool failed: {0}")]
    Tool(#[from] ToolError),

    #[error("retrieval failed: {0}")]
    Rag(#[from] RagError),
}

pub type Result<T> = std::result::Result<T, RouterError>;
