//! # scout-router
//!
//! Turns one user message into one reply.
//!
//! [`DialogueRouter::handle_turn`] applies, in order: reset, index update,
//! grounded answer from the retrieval store, then either plain chat or a chat
//! offering tools when the message names a local directory. The keyword and
//! path rules live in [`intent`] as plain functions.

pub mod error;
pub mod intent;
pub mod router;

pub use error::{Result, RouterError};
pub use intent::{Intent, classify_intent, extract_directory_path};
pub use router::{
    ANALYSIS_SYSTEM_PROMPT, CHAT_SYSTEM_PROMPT, DialogueRouter, INDEX_UPDATED_REPLY, RESET_REPLY,
};
