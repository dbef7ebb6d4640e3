//! Response types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::document::Document;
use crate::preprocessing::DocumentKind;

/// Body returned by `POST /ask`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    /// Generated answer
    pub answer: String,
    /// Number of chunks passed to the LLM
    pub chunks_retrieved: usize,
}

/// Body returned by `POST /upload`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Human-readable summary, e.g. "12 new chunks indexed."
    pub message: String,
    /// The indexed (or already known) document
    pub document: DocumentSummary,
    /// Chunks added by this upload
    pub chunks_indexed: usize,
    /// Processor that decomposed the document
    pub kind: Option<DocumentKind>,
    /// Whether the upload was skipped as unchanged or duplicate
    pub skipped: bool,
}

impl UploadResponse {
    /// Response for a freshly indexed document
    pub fn indexed(document: &Document, chunks_indexed: usize) -> Self {
        Self {
            message: format!("{} new chunks indexed.", chunks_indexed),
            document: DocumentSummary::from(document),
            chunks_indexed,
            kind: document.kind,
            skipped: false,
        }
    }

    /// Response for an upload whose content is already indexed
    pub fn skipped(existing: &Document) -> Self {
        Self {
            message: "0 new chunks indexed.".to_string(),
            document: DocumentSummary::from(existing),
            chunks_indexed: 0,
            kind: existing.kind,
            skipped: true,
        }
    }
}

/// Registry entry as listed by `GET /documents`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub id: Uuid,
    pub filename: String,
    pub total_pages: Option<u32>,
    pub total_chunks: u32,
    pub kind: Option<DocumentKind>,
    pub ingested_at: chrono::DateTime<chrono::Utc>,
}

impl From<&Document> for DocumentSummary {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id,
            filename: doc.filename.clone(),
            total_pages: doc.total_pages,
            total_chunks: doc.total_chunks,
            kind: doc.kind,
            ingested_at: doc.ingested_at,
        }
    }
}

/// Body returned by `GET /documents`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentListResponse {
    pub documents: Vec<DocumentSummary>,
    pub total_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indexed_message() {
        let mut doc = Document::new("grade.pdf".to_string(), "h".to_string(), 42);
        doc.kind = Some(DocumentKind::SubjectGrid);

        let resp = UploadResponse::indexed(&doc, 12);
        assert_eq!(resp.message, "12 new chunks indexed.");
        assert!(!resp.skipped);

        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["kind"], "subject_grid");
    }

    #[test]
    fn test_skipped_reports_zero() {
        let doc = Document::new("grade.pdf".to_string(), "h".to_string(), 42);
        let resp = UploadResponse::skipped(&doc);
        assert_eq!(resp.chunks_indexed, 0);
        assert!(resp.skipped);
        assert_eq!(resp.document.id, doc.id);
    }
}
