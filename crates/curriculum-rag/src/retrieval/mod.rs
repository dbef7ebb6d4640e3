//! Chunk storage and similarity search

mod store;

pub use store::{SearchResult, VectorStore};
