//! Provider abstractions for embeddings, LLM and vector storage
//!
//! The server only talks to these traits; Ollama and the local vector store
//! are the shipped implementations.

pub mod embedding;
pub mod llm;
pub mod local;
pub mod ollama;
pub mod vector_store;

pub use embedding::EmbeddingProvider;
pub use llm::LlmProvider;
pub use vector_store::{VectorSearchResult, VectorStoreProvider};
