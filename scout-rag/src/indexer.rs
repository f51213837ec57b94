//! Loads a directory of source files into a [`RetrievalStore`].

use std::path::Path;
use std::sync::Arc;

use scout_core::files::collect_source_files;
use tracing::{error, info, warn};

use crate::chunking::Chunker;
use crate::document::{Chunk, Document};
use crate::store::RetrievalStore;

/// What a single [`Indexer::index`] run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexReport {
    /// Files matching the source-extension filter.
    pub files_found: usize,
    /// Files read successfully as UTF-8.
    pub files_loaded: usize,
    /// Files that could not be read.
    pub files_skipped: usize,
    /// Chunks written to the store.
    pub chunks_added: usize,
    /// The store was uninitialized, so this run initialized it instead of adding.
    pub bootstrapped: bool,
}

/// Walks a directory, chunks every source file and adds the chunks to the store.
///
/// ```rust,ignore
/// let indexer = Indexer::new(store.clone(), Arc::new(FixedSizeChunker::new(1000, 200)));
/// let report = indexer.index(Path::new("/home/me/project")).await;
/// ```
pub struct Indexer {
    store: Arc<RetrievalStore>,
    chunker: Arc<dyn Chunker>,
}

impl Indexer {
    pub fn new(store: Arc<RetrievalStore>, chunker: Arc<dyn Chunker>) -> Self {
        Self { store, chunker }
    }

    /// Index every source file under `root`.
    ///
    /// Never fails: unreadable files are skipped and a failed add is logged
    /// and reported as `chunks_added == 0`. When the store is not yet
    /// available, the run initializes it and the loaded chunks are not added.
    pub async fn index(&self, root: &Path) -> IndexReport {
        let files = collect_source_files(root);
        let mut report = IndexReport { files_found: files.len(), ..IndexReport::default() };

        let mut chunks: Vec<Chunk> = Vec::new();
        for path in &files {
            match tokio::fs::read_to_string(path).await {
                Ok(text) => {
                    report.files_loaded += 1;
                    chunks.extend(self.chunker.chunk(&Document::from_file(path, text)));
                }
                Err(e) => {
                    report.files_skipped += 1;
                    warn!(path = %path.display(), error = %e, "skipping unreadable file");
                }
            }
        }

        info!(
            root = %root.display(),
            files_loaded = report.files_loaded,
            files_skipped = report.files_skipped,
            chunk_count = chunks.len(),
            "documents loaded and chunked"
        );

        if !self.store.is_available().await {
            report.bootstrapped = self.store.initialize().await;
            info!(
                bootstrapped = report.bootstrapped,
                "vector store was not initialized, initialized it"
            );
            return report;
        }

        match self.store.add(chunks).await {
            Ok(added) => report.chunks_added = added,
            Err(e) => {
                error!(root = %root.display(), error = %e, "failed to add chunks to vector store")
            }
        }
        report
    }
}
