//! Source-file selection shared by the indexer and the repository analyzer.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

/// Extensions (without the dot) that are read as text sources.
pub const SOURCE_EXTENSIONS: &[&str] = &["py", "java", "js", "rs", "sh", "txt", "log", "md"];

/// Any path containing this marker is skipped.
pub const EXCLUDED_PATH_MARKER: &str = "node_modules";

/// Whether `path` has one of the [`SOURCE_EXTENSIONS`].
pub fn has_source_extension(path: &Path) -> bool {
    path.extension().and_then(OsStr::to_str).is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

fn is_excluded(path: &Path) -> bool {
    path.to_string_lossy().contains(EXCLUDED_PATH_MARKER)
}

/// Recursively collect source files under `root`, sorted by file name within
/// each directory.
///
/// Entries that cannot be read are logged and skipped. A missing root yields
/// an empty list.
pub fn collect_source_files(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_excluded(entry.path()))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(root = %root.display(), error = %e, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && has_source_extension(entry.path()))
        .map(|entry| entry.into_path())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_collects_allowed_extensions_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("main.rs"), "fn main() {}").unwrap();
        fs::write(dir.path().join("notes.md"), "# notes").unwrap();
        fs::write(dir.path().join("image.png"), [0u8, 1, 2]).unwrap();
        fs::write(dir.path().join("Makefile"), "all:").unwrap();

        let files = collect_source_files(dir.path());
        let names: Vec<_> =
            files.iter().map(|p| p.file_name().unwrap().to_string_lossy().to_string()).collect();
        assert_eq!(names, vec!["main.rs", "notes.md"]);
    }

    #[test]
    fn test_skips_node_modules_and_recurses() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src/nested")).unwrap();
        fs::create_dir_all(dir.path().join("node_modules/pkg")).unwrap();
        fs::write(dir.path().join("src/nested/lib.py"), "x = 1").unwrap();
        fs::write(dir.path().join("node_modules/pkg/index.js"), "module.exports = {}").unwrap();

        let files = collect_source_files(dir.path());
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("src/nested/lib.py"));
    }

    #[test]
    fn test_missing_root_is_empty() {
        assert!(collect_source_files(Path::new("/definitely/not/here/scout")).is_empty());
    }
}
