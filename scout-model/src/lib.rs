//! # scout-model
//!
//! Chat model implementations for Scout.
//!
//! - [`OllamaClient`] - a local Ollama server (or any endpoint speaking the
//!   same `/api/chat` JSON protocol)
//! - [`MockChatModel`] - scripted replies for tests
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use scout_core::{ChatModel, ChatRequest, Message};
//! use scout_model::{OllamaClient, OllamaConfig};
//!
//! let model = OllamaClient::new(OllamaConfig::default())?;
//! let reply = model.chat(ChatRequest::new(vec![Message::user("hello")])).await?;
//! ```

pub mod mock;
pub mod ollama;

pub use mock::MockChatModel;
pub use ollama::{OllamaClient, OllamaConfig};
