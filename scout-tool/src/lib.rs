//! # scout-tool
//!
//! Tools the Scout assistant advertises to the chat model.
//!
//! - [`RepoAnalyzer`] - `analyze_repository`: reads a local repository, caches
//!   the aggregated text and asks the model for a structural summary
//!
//! Every tool implements [`scout_core::Tool`].

pub mod repo_analyzer;

pub use repo_analyzer::{DEFAULT_CACHE_DIR, RepoAnalyzer};
