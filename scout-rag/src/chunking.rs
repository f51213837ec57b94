//! Document chunking.
//!
//! [`FixedSizeChunker`] splits text into windows of a fixed number of
//! characters, each window starting `chunk_size - chunk_overlap` characters
//! after the previous one.

use crate::document::{Chunk, Document};

/// Metadata key holding the position of a chunk within its document.
pub const CHUNK_INDEX: &str = "chunk_index";
/// Metadata key holding the character offset where a chunk starts.
pub const START_OFFSET: &str = "start_offset";

/// A strategy for splitting documents into chunks.
///
/// Implementations produce [`Chunk`]s with text and metadata but no embeddings.
/// Embeddings are attached later by the retrieval store.
pub trait Chunker: Send + Sync {
    /// Split a document into chunks.
    ///
    /// Returns an empty `Vec` if the document has empty text.
    /// Each returned chunk has an empty embedding vector.
    fn chunk(&self, document: &Document) -> Vec<Chunk>;
}

/// Splits text into fixed-size chunks by character count with configurable overlap.
///
/// Sizes count Unicode scalar values, so multi-byte text is never cut inside a
/// character. Chunk IDs are generated as `{document_id}_{chunk_index}`. Each
/// chunk inherits the parent document's metadata plus `chunk_index` and
/// `start_offset` fields. The last chunk always ends at the end of the text;
/// no trailing chunk is emitted that lies entirely inside its predecessor.
///
/// # Example
///
/// ```rust,ignore
/// use scout_rag::FixedSizeChunker;
///
/// let chunker = FixedSizeChunker::new(1000, 200);
/// let chunks = chunker.chunk(&document);
/// ```
#[derive(Debug, Clone)]
pub struct FixedSizeChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl FixedSizeChunker {
    /// Create a new `FixedSizeChunker`.
    ///
    /// # Arguments
    ///
    /// * `chunk_size` - maximum number of characters per chunk
    /// * `chunk_overlap` - number of overlapping characters between consecutive chunks,
    ///   clamped to `chunk_size - 1` so every window advances by at least one character
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self { chunk_size, chunk_overlap: chunk_overlap.min(chunk_size.saturating_sub(1)) }
    }

    /// Character offsets `(start, end)` of every window over `char_count` characters.
    fn windows(&self, char_count: usize) -> Vec<(usize, usize)> {
        let mut windows = Vec::new();
        if char_count == 0 || self.chunk_size == 0 {
            return windows;
        }

        let step = self.chunk_size - self.chunk_overlap;
        let mut start = 0;
        loop {
            let end = (start + self.chunk_size).min(char_count);
            windows.push((start, end));
            if end == char_count {
                break;
            }
            start += step;
        }
        windows
    }
}

impl Default for FixedSizeChunker {
    fn default() -> Self {
        Self::new(1000, 200)
    }
}

impl Chunker for FixedSizeChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        if document.text.is_empty() {
            return Vec::new();
        }

        let text = &document.text;
        // Byte offset of every char boundary, including the end of the text.
        let boundaries: Vec<usize> =
            text.char_indices().map(|(i, _)| i).chain(std::iter::once(text.len())).collect();
        let char_count = boundaries.len() - 1;

        self.windows(char_count)
            .into_iter()
            .enumerate()
            .map(|(chunk_index, (start, end))| {
                let mut metadata = document.metadata.clone();
                metadata.insert(CHUNK_INDEX.to_string(), chunk_index.to_string());
                metadata.insert(START_OFFSET.to_string(), start.to_string());

                Chunk {
                    id: format!("{}_{chunk_index}", document.id),
                    text: text[boundaries[start]..boundaries[end]].to_string(),
                    embedding: Vec::new(),
                    metadata,
                    document_id: document.id.clone(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn doc(text: &str) -> Document {
        Document {
            id: "doc".into(),
            text: text.into(),
            metadata: HashMap::from([("file_name".to_string(), "a.txt".to_string())]),
            source_uri: None,
        }
    }

    #[test]
    fn test_empty_document_has_no_chunks() {
        assert!(FixedSizeChunker::default().chunk(&doc("")).is_empty());
    }

    #[test]
    fn test_short_document_is_single_chunk() {
        let chunks = FixedSizeChunker::default().chunk(&doc("hello"));
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "hello");
        assert_eq!(chunks[0].id, "doc_0");
        assert_eq!(chunks[0].metadata["file_name"], "a.txt");
    }

    #[test]
    fn test_2500_chars_yields_three_overlapping_chunks() {
        let text: String = (0..2500).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
        let chunks = FixedSizeChunker::new(1000, 200).chunk(&doc(&text));

        let starts: Vec<&str> = chunks.iter().map(|c| c.metadata[START_OFFSET].as_str()).collect();
        assert_eq!(starts, vec!["0", "800", "1600"]);
        assert!(chunks.iter().all(|c| c.text.chars().count() <= 1000));
        assert_eq!(chunks[2].text.chars().count(), 900);

        for pair in chunks.windows(2) {
            let prev: Vec<char> = pair[0].text.chars().collect();
            let next: Vec<char> = pair[1].text.chars().collect();
            assert_eq!(prev[prev.len() - 200..], next[..200]);
        }
    }

    #[test]
    fn test_multibyte_text_is_split_on_char_boundaries() {
        let text = "é".repeat(15);
        let chunks = FixedSizeChunker::new(10, 2).chunk(&doc(&text));
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].text.chars().count(), 10);
        assert_eq!(chunks[1].text.chars().count(), 7);
    }

    #[test]
    fn test_oversized_overlap_still_covers_whole_text() {
        for overlap in [4, 9] {
            let chunks = FixedSizeChunker::new(4, overlap).chunk(&doc("abcdefgh"));
            let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
            assert_eq!(texts, vec!["abcd", "bcde", "cdef", "defg", "efgh"]);
        }
    }

    #[test]
    fn test_zero_size_yields_nothing() {
        assert!(FixedSizeChunker::new(0, 0).chunk(&doc("abc")).is_empty());
    }
}
