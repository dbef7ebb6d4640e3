//! Character-sized chunk splitting
//!
//! Wraps `text_splitter`, which breaks at the coarsest boundary that still
//! fits (paragraphs, then lines, sentences, words and characters), and carries
//! segment tags over to every piece.

use text_splitter::{Characters, ChunkConfig, TextSplitter};

use crate::error::{Error, Result};
use crate::preprocessing::Segment;

/// Splitter measuring chunk length in characters
pub struct ChunkSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    inner: TextSplitter<Characters>,
}

impl ChunkSplitter {
    /// Create a splitter; the overlap must be smaller than the chunk size
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        let config = ChunkConfig::new(chunk_size)
            .with_overlap(chunk_overlap)
            .map_err(|e| Error::Config(format!("Invalid chunking settings: {}", e)))?;

        Ok(Self {
            chunk_size,
            chunk_overlap,
            inner: TextSplitter::new(config),
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Split text into trimmed, non-empty chunks
    pub fn split_text(&self, text: &str) -> Vec<String> {
        self.inner
            .chunks(text)
            .map(str::trim)
            .filter(|chunk| !chunk.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Split a segment, copying its tags onto every piece
    pub fn split_segment(&self, segment: &Segment) -> Vec<Segment> {
        self.split_text(segment.text())
            .into_iter()
            .map(|text| segment.with_text(text))
            .collect()
    }
}
