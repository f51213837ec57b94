//! Error types shared across Scout crates.

use thiserror::Error;

/// Errors raised while talking to a remote chat endpoint.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The endpoint answered with a non-success status.
    #[error("Error: {status}, {body}")]
    Status {
        /// HTTP status code returned by the endpoint.
        status: u16,
        /// Raw response body, kept for the user-visible error.
        body: String,
    },

    /// The request never produced a response (connection refused, reset, ...).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response body could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The client was configured with unusable settings.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors a [`Tool`](crate::Tool) cannot turn into a structured payload.
///
/// Bad arguments are *not* errors: tools report them as an `{"error": ...}`
/// payload so the model can explain the problem to the user.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The model call made by the tool failed.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Filesystem failure outside the per-file recovery paths.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The tool result could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
