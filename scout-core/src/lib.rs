//! # scout-core
//!
//! Shared contracts for the Scout assistant.
//!
//! ## Overview
//!
//! Every other Scout crate talks through the types defined here:
//!
//! - [`Message`] / [`Role`] - one turn of a conversation
//! - [`ChatModel`] - a remote chat endpoint that may answer with tool calls
//! - [`Tool`] / [`ToolDescriptor`] - a capability advertised to the model
//! - [`files`] - the source-file selection rules shared by indexing and analysis
//!
//! The concrete model client lives in `scout-model`, retrieval in `scout-rag`,
//! and the routing logic in `scout-router`.

pub mod error;
pub mod files;
pub mod message;
pub mod model;
pub mod tool;

pub use error::{ModelError, ToolError};
pub use message::{FunctionCall, Message, Role, ToolCall};
pub use model::{ChatModel, ChatRequest, ChatResponse};
pub use tool::{Tool, ToolDescriptor, error_payload};
