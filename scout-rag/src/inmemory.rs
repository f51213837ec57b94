//! In-memory vector store using cosine similarity.
//!
//! [`InMemoryVectorStore`] keeps every collection in a `HashMap` behind a
//! `tokio::sync::RwLock`. It serves tests and development directly, and is
//! the index behind [`LocalVectorStore`](crate::LocalVectorStore).

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::{Chunk, SearchResult};
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

#[derive(Debug, Default)]
struct Collection {
    // Zero means "not fixed": any embedding length is accepted.
    dimensions: usize,
    chunks: HashMap<String, Chunk>,
}

impl Collection {
    fn check_dimensions(&self, name: &str, len: usize) -> Result<()> {
        if self.dimensions == 0 || self.dimensions == len {
            return Ok(());
        }
        Err(RagError::VectorStoreError {
            backend: "InMemory".to_string(),
            message: format!(
                "collection '{name}' holds {}-dimensional embeddings, got {len}",
                self.dimensions
            ),
        })
    }
}

/// A vector store held entirely in memory.
///
/// Each collection fixes its embedding dimensionality at creation; upserts
/// and searches with a different length are rejected.
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn missing_collection(collection: &str) -> RagError {
    RagError::VectorStoreError {
        backend: "InMemory".to_string(),
        message: format!("collection '{collection}' does not exist"),
    }
}

/// Cosine similarity of two vectors; 0.0 if either has zero magnitude.
pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let (dot, norm_a, norm_b) =
        a.iter().zip(b).fold((0.0f32, 0.0f32, 0.0f32), |(dot, na, nb), (x, y)| {
            (dot + x * y, na + x * x, nb + y * y)
        });
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn create_collection(&self, name: &str, dimensions: usize) -> Result<()> {
        let mut collections = self.collections.write().await;
        collections
            .entry(name.to_string())
            .or_insert_with(|| Collection { dimensions, chunks: HashMap::new() });
        Ok(())
    }

    async fn delete_collection(&self, name: &str) -> Result<()> {
        self.collections.write().await.remove(name);
        Ok(())
    }

    async fn upsert(&self, collection: &str, chunks: &[Chunk]) -> Result<()> {
        let mut collections = self.collections.write().await;
        let target = collections.get_mut(collection).ok_or_else(|| missing_collection(collection))?;
        for chunk in chunks {
            target.check_dimensions(collection, chunk.embedding.len())?;
        }
        target.chunks.extend(chunks.iter().map(|chunk| (chunk.id.clone(), chunk.clone())));
        Ok(())
    }

    async fn delete(&self, collection: &str, ids: &[&str]) -> Result<()> {
        let mut collections = self.collections.write().await;
        let target = collections.get_mut(collection).ok_or_else(|| missing_collection(collection))?;
        for id in ids {
            target.chunks.remove(*id);
        }
        Ok(())
    }

    async fn list(&self, collection: &str) -> Result<Vec<Chunk>> {
        let collections = self.collections.read().await;
        let target = collections.get(collection).ok_or_else(|| missing_collection(collection))?;
        let mut chunks: Vec<Chunk> = target.chunks.values().cloned().collect();
        chunks.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(chunks)
    }

    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>> {
        let collections = self.collections.read().await;
        let target = collections.get(collection).ok_or_else(|| missing_collection(collection))?;
        target.check_dimensions(collection, embedding.len())?;

        let mut scored: Vec<SearchResult> = target
            .chunks
            .values()
            .map(|chunk| SearchResult {
                chunk: chunk.clone(),
                score: cosine_similarity(&chunk.embedding, embedding),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        scored.truncate(top_k);
        Ok(scored)
    }
}
