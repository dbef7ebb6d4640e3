//! curriculum-rag: question answering over course curriculum PDFs
//!
//! Uploaded PDFs are classified and decomposed by a chain of document
//! processors (workload structure, semester subject grid, generic text),
//! split into overlapping chunks, embedded and stored in a local vector store.
//! Questions are answered by an LLM grounded on the retrieved chunks.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod preprocessing;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use preprocessing::{ChainOutcome, DocumentKind, DocumentProcessor, ProcessorChain, Segment};
pub use types::{
    document::{Chunk, Document},
    query::AskRequest,
    response::{AskResponse, UploadResponse},
};
