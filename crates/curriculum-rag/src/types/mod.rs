//! Core types for the service

pub mod document;
pub mod query;
pub mod response;

pub use document::{Chunk, Document};
pub use query::AskRequest;
pub use response::{AskResponse, DocumentListResponse, DocumentSummary, UploadResponse};
