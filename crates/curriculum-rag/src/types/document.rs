//! Document and chunk types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::preprocessing::{DocumentKind, Tags};

/// A PDF that has been ingested
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique document ID
    pub id: Uuid,
    /// Original filename as uploaded
    pub filename: String,
    /// Content hash for deduplication
    pub content_hash: String,
    /// Total number of pages
    pub total_pages: Option<u32>,
    /// Total number of chunks indexed
    pub total_chunks: u32,
    /// File size in bytes
    pub file_size: u64,
    /// Shape the processor chain recognized
    #[serde(default)]
    pub kind: Option<DocumentKind>,
    /// Ingestion timestamp
    pub ingested_at: chrono::DateTime<chrono::Utc>,
}

impl Document {
    /// Create a new document record
    pub fn new(filename: String, content_hash: String, file_size: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            filename,
            content_hash,
            total_pages: None,
            total_chunks: 0,
            file_size,
            kind: None,
            ingested_at: chrono::Utc::now(),
        }
    }
}

/// A chunk of text from a document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique chunk ID
    pub id: Uuid,
    /// Parent document ID
    pub document_id: Uuid,
    /// Text content, without any embedding prefix
    pub content: String,
    /// Embedding vector
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub embedding: Vec<f32>,
    /// Chunk index within document
    pub chunk_index: u32,
    /// Segment tags plus `document_id`, `filename` and `chunk_index`
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl Chunk {
    /// Create a chunk carrying the tags of the segment it was cut from
    pub fn new(document: &Document, content: String, chunk_index: u32, tags: &Tags) -> Self {
        let mut metadata: BTreeMap<String, serde_json::Value> = tags
            .iter()
            .map(|(key, value)| (key.clone(), value.to_json()))
            .collect();
        metadata.insert("document_id".to_string(), serde_json::json!(document.id.to_string()));
        metadata.insert("filename".to_string(), serde_json::json!(document.filename));
        metadata.insert("chunk_index".to_string(), serde_json::json!(chunk_index));

        Self {
            id: Uuid::new_v4(),
            document_id: document.id,
            content,
            embedding: Vec::new(),
            chunk_index,
            metadata,
        }
    }

    /// Textual metadata value
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(|v| v.as_str())
    }

    /// Numeric metadata value
    pub fn metadata_u64(&self, key: &str) -> Option<u64> {
        self.metadata.get(key).and_then(|v| v.as_u64())
    }
}
