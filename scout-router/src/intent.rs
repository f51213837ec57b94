//! Intent classification for incoming messages.
//!
//! Routing precedence is `Reset` > `IndexUpdate` > (grounded answer attempt,
//! made by the router) > `DirectChat` / `ToolEligible`. Classification itself
//! is pure; only [`extract_directory_path`] touches the filesystem.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

/// Phrases that wipe history, cache and store.
pub const RESET_PHRASES: &[&str] = &["clear history", "clear context", "clear data"];

/// Phrases that, together with a directory path, request re-indexing.
pub const INDEX_PHRASES: &[&str] = &["use rag", "using rag", "use retrieval augmented generation"];

static PATH_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/\S+").expect("unreachable error: failed to compile path pattern")
});

/// What a message asks the router to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Clear history, cached repository text and the retrieval store.
    Reset,
    /// Index the directory into the retrieval store.
    IndexUpdate(PathBuf),
    /// Plain conversation, no tools offered.
    DirectChat,
    /// The message names a directory; offer tools.
    ToolEligible(PathBuf),
}

fn contains_any(message: &str, phrases: &[&str]) -> bool {
    let lowered = message.to_lowercase();
    phrases.iter().any(|phrase| lowered.contains(phrase))
}

pub fn is_reset_request(message: &str) -> bool {
    contains_any(message, RESET_PHRASES)
}

pub fn is_index_request(message: &str) -> bool {
    contains_any(message, INDEX_PHRASES)
}

/// Classify `message`, given the directory already extracted from it.
pub fn classify_intent(message: &str, directory: Option<PathBuf>) -> Intent {
    if is_reset_request(message) {
        return Intent::Reset;
    }
    match directory {
        Some(dir) if is_index_request(message) => Intent::IndexUpdate(dir),
        Some(dir) => Intent::ToolEligible(dir),
        None => Intent::DirectChat,
    }
}

/// Every whitespace-free token starting with `/`, in order of appearance.
pub fn path_candidates(message: &str) -> impl Iterator<Item = &str> {
    PATH_TOKEN.find_iter(message).map(|m| m.as_str())
}

/// The first path token in `message` that names an existing directory.
pub fn extract_directory_path(message: &str) -> Option<PathBuf> {
    path_candidates(message).map(Path::new).find(|path| path.is_dir()).map(Path::to_path_buf)
}
