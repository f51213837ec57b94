//! Disk-persisted vector store.
//!
//! [`LocalVectorStore`] keeps its index in an [`InMemoryVectorStore`] and
//! mirrors every collection to `<directory>/<collection>.json` after each
//! mutation. Opening a collection whose snapshot already exists loads it back.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::document::{Chunk, SearchResult};
use crate::error::{RagError, Result};
use crate::inmemory::InMemoryVectorStore;
use crate::vectorstore::VectorStore;

#[derive(Serialize, Deserialize)]
struct Snapshot {
    collection: String,
    dimensions: usize,
    chunks: Vec<Chunk>,
}

/// A [`VectorStore`] persisted as JSON snapshots in a directory.
///
/// # Example
///
/// ```rust,ignore
/// use scout_rag::{LocalVectorStore, VectorStore};
///
/// let store = LocalVectorStore::new("developer_assistant_vectorstore");
/// store.create_collection("docs", 384).await?; // loads docs.json if present
/// ```
#[derive(Debug)]
pub struct LocalVectorStore {
    directory: PathBuf,
    index: InMemoryVectorStore,
    // Dimensions per open collection. Held across mutate-then-snapshot so
    // snapshots never interleave.
    dimensions: Mutex<HashMap<String, usize>>,
}

impl LocalVectorStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            index: InMemoryVectorStore::new(),
            dimensions: Mutex::new(HashMap::new()),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn snapshot_path(&self, collection: &str) -> PathBuf {
        self.directory.join(format!("{collection}.json"))
    }

    async fn load_snapshot(&self, collection: &str) -> Result<Option<Snapshot>> {
        let path = self.snapshot_path(collection);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let snapshot = serde_json::from_slice(&bytes).map_err(|e| RagError::VectorStoreError {
            backend: "Local".to_string(),
            message: format!("corrupt snapshot {}: {e}", path.display()),
        })?;
        Ok(Some(snapshot))
    }

    async fn write_snapshot(&self, collection: &str, dimensions: usize) -> Result<()> {
        let chunks = self.index.list(collection).await?;
        let chunk_count = chunks.len();
        let snapshot = Snapshot { collection: collection.to_string(), dimensions, chunks };
        let bytes = serde_json::to_vec(&snapshot).map_err(|e| RagError::VectorStoreError {
            backend: "Local".to_string(),
            message: format!("failed to serialize collection '{collection}': {e}"),
        })?;

        tokio::fs::create_dir_all(&self.directory).await?;
        let path = self.snapshot_path(collection);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &path).await?;

        debug!(collection, chunk_count, path = %path.display(), "snapshot written");
        Ok(())
    }
}

#[async_trait]
impl VectorStore for LocalVectorStore {
    async fn create_collection(&self, name: &str, dimensions: usize) -> Result<()> {
        let mut open = self.dimensions.lock().await;
        if open.contains_key(name) {
            return Ok(());
        }

        match self.load_snapshot(name).await? {
            Some(snapshot) => {
                info!(
                    collection = name,
                    chunk_count = snapshot.chunks.len(),
                    "loaded collection from disk"
                );
                self.index.create_collection(name, snapshot.dimensions).await?;
                self.index.upsert(name, &snapshot.chunks).await?;
                open.insert(name.to_string(), snapshot.dimensions);
            }
            None => {
                self.index.create_collection(name, dimensions).await?;
                self.write_snapshot(name, dimensions).await?;
                open.insert(name.to_string(), dimensions);
            }
        }
        Ok(())
    }

    async fn delete_collection(&self, name: &str) -> Result<()> {
        let mut open = self.dimensions.lock().await;
        open.remove(name);
        self.index.delete_collection(name).await?;
        match tokio::fs::remove_file(self.snapshot_path(name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn upsert(&self, collection: &str, chunks: &[Chunk]) -> Result<()> {
        let open = self.dimensions.lock().await;
        self.index.upsert(collection, chunks).await?;
        let dimensions = open.get(collection).copied().unwrap_or_default();
        self.write_snapshot(collection, dimensions).await
    }

    async fn delete(&self, collection: &str, ids: &[&str]) -> Result<()> {
        let open = self.dimensions.lock().await;
        self.index.delete(collection, ids).await?;
        let dimensions = open.get(collection).copied().unwrap_or_default();
        self.write_snapshot(collection, dimensions).await
    }

    async fn list(&self, collection: &str) -> Result<Vec<Chunk>> {
        self.index.list(collection).await
    }

    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>> {
        self.index.search(collection, embedding, top_k).await
    }

    async fn close(&self) -> Result<()> {
        // Every mutation is already on disk; wait for an in-flight write to finish.
        let _open = self.dimensions.lock().await;
        debug!(directory = %self.directory.display(), "local vector store closed");
        Ok(())
    }
}
