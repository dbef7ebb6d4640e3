//! Application state for the RAG server

use dashmap::DashMap;
use parking_lot::RwLock;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;
use uuid::Uuid;

use crate::config::RagConfig;
use crate::error::Result;
use crate::ingestion::IngestPipeline;
use crate::providers::{
    local::LocalVectorStore, ollama::OllamaProvider, EmbeddingProvider, LlmProvider,
    VectorStoreProvider,
};
use crate::retrieval::VectorStore;
use crate::types::Document;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: RagConfig,
    /// Vector store for chunks
    vector_store_provider: Arc<dyn VectorStoreProvider>,
    /// Embedding provider
    embedding_provider: Arc<dyn EmbeddingProvider>,
    /// LLM provider
    llm_provider: Arc<dyn LlmProvider>,
    /// Processor chain and splitter
    pipeline: Arc<IngestPipeline>,
    /// Document registry (persisted to disk)
    documents: DashMap<Uuid, Document>,
    /// Path to documents registry file
    documents_path: PathBuf,
    /// Serializes dedup checks with the indexing that follows them
    ingest_lock: Arc<tokio::sync::Mutex<()>>,
    /// Ready state
    ready: RwLock<bool>,
}

impl AppState {
    /// Create new application state backed by Ollama and the local store
    pub async fn new(config: RagConfig) -> Result<Self> {
        tracing::info!("Initializing RAG application state...");

        let vector_store = Arc::new(VectorStore::new(&config)?);
        tracing::info!("Vector store initialized ({} chunks)", vector_store.len()?);

        let (embedder, llm) = OllamaProvider::new(
            &config.llm,
            config.embeddings.dimensions,
            config.preprocessing.locale,
        )?
        .split();
        tracing::info!(
            "Ollama providers initialized (embed: {}, generate: {})",
            config.llm.embed_model,
            config.llm.generate_model
        );

        let state = Self::with_providers(
            config,
            Arc::new(embedder),
            Arc::new(llm),
            Arc::new(LocalVectorStore::new(vector_store)),
        )?;
        state.check_backends().await;
        Ok(state)
    }

    /// Create state around already-built providers
    pub fn with_providers(
        config: RagConfig,
        embedding_provider: Arc<dyn EmbeddingProvider>,
        llm_provider: Arc<dyn LlmProvider>,
        vector_store_provider: Arc<dyn VectorStoreProvider>,
    ) -> Result<Self> {
        let storage_dir = config.storage_dir();
        fs::create_dir_all(&storage_dir)?;

        let documents_path = storage_dir.join("documents.json");
        let documents = Self::load_documents(&documents_path);
        tracing::info!("Loaded {} documents from registry", documents.len());

        let pipeline = Arc::new(IngestPipeline::from_config(&config)?);
        tracing::info!(
            "Ingest pipeline ready (locale: {:?}, chunk size: {}, overlap: {})",
            config.preprocessing.locale,
            config.chunking.chunk_size,
            config.chunking.chunk_overlap
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                vector_store_provider,
                embedding_provider,
                llm_provider,
                pipeline,
                documents,
                documents_path,
                ingest_lock: Arc::new(tokio::sync::Mutex::new(())),
                ready: RwLock::new(true),
            }),
        })
    }

    /// Load documents from disk
    fn load_documents(path: &Path) -> DashMap<Uuid, Document> {
        let documents = DashMap::new();

        if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => match serde_json::from_str::<Vec<Document>>(&content) {
                    Ok(docs) => {
                        for doc in docs {
                            documents.insert(doc.id, doc);
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse documents.json: {}", e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read documents.json: {}", e);
                }
            }
        }

        documents
    }

    /// Save documents to disk
    fn save_documents(&self) {
        let docs = self.list_documents();

        match serde_json::to_string_pretty(&docs) {
            Ok(content) => {
                if let Err(e) = fs::write(&self.inner.documents_path, content) {
                    tracing::error!("Failed to save documents.json: {}", e);
                }
            }
            Err(e) => {
                tracing::error!("Failed to serialize documents: {}", e);
            }
        }
    }

    /// Get configuration
    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    /// Get embedding provider
    pub fn embedding_provider(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.inner.embedding_provider
    }

    /// Get LLM provider
    pub fn llm_provider(&self) -> &Arc<dyn LlmProvider> {
        &self.inner.llm_provider
    }

    /// Get vector store provider
    pub fn vector_store_provider(&self) -> &Arc<dyn VectorStoreProvider> {
        &self.inner.vector_store_provider
    }

    /// Get ingest pipeline
    pub fn pipeline(&self) -> &Arc<IngestPipeline> {
        &self.inner.pipeline
    }

    /// Lock held while an upload is checked and indexed
    ///
    /// The guard is owned so a spawned commit can keep holding it after the
    /// request that started it is gone.
    pub async fn lock_ingest(&self) -> OwnedMutexGuard<()> {
        self.inner.ingest_lock.clone().lock_owned().await
    }

    /// Check if the server is ready
    pub fn is_ready(&self) -> bool {
        *self.inner.ready.read()
    }

    /// Set ready state
    pub fn set_ready(&self, ready: bool) {
        *self.inner.ready.write() = ready;
    }

    /// Health-check every backend and update the ready flag
    pub async fn check_backends(&self) -> bool {
        let embedder = self.inner.embedding_provider.health_check().await;
        let llm = self.inner.llm_provider.health_check().await;
        let store = self.inner.vector_store_provider.health_check().await;

        let mut ready = true;
        for (name, result) in [("embedder", embedder), ("llm", llm), ("vector store", store)] {
            match result {
                Ok(true) => {}
                Ok(false) => {
                    tracing::warn!("{} backend is not available", name);
                    ready = false;
                }
                Err(e) => {
                    tracing::warn!("{} health check failed: {}", name, e);
                    ready = false;
                }
            }
        }

        if ready != self.is_ready() {
            tracing::info!("Readiness changed to {}", ready);
        }
        self.set_ready(ready);
        ready
    }

    /// Add a document to the registry (persisted to disk)
    pub fn add_document(&self, doc: Document) {
        self.inner.documents.insert(doc.id, doc);
        self.save_documents();
    }

    /// Get a document by ID
    pub fn get_document(&self, id: &Uuid) -> Option<Document> {
        self.inner.documents.get(id).map(|d| d.clone())
    }

    /// Remove a document (persisted to disk)
    pub fn remove_document(&self, id: &Uuid) -> Option<Document> {
        let removed = self.inner.documents.remove(id).map(|(_, d)| d);
        if removed.is_some() {
            self.save_documents();
        }
        removed
    }

    /// List all documents, oldest first
    pub fn list_documents(&self) -> Vec<Document> {
        let mut docs: Vec<Document> = self
            .inner
            .documents
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        docs.sort_by_key(|d| d.ingested_at);
        docs
    }

    /// Find document by filename
    pub fn find_by_filename(&self, filename: &str) -> Option<Document> {
        self.inner
            .documents
            .iter()
            .find(|entry| entry.value().filename == filename)
            .map(|entry| entry.value().clone())
    }

    /// Find document by content hash
    pub fn find_by_hash(&self, content_hash: &str) -> Option<Document> {
        self.inner
            .documents
            .iter()
            .find(|entry| entry.value().content_hash == content_hash)
            .map(|entry| entry.value().clone())
    }

    /// Decide what an upload should do with the registry
    pub fn check_file_status(&self, filename: &str, content_hash: &str) -> FileStatus {
        // Identical content wins over a filename match
        if let Some(existing) = self.find_by_hash(content_hash) {
            if existing.filename == filename {
                return FileStatus::Unchanged(existing);
            }
            return FileStatus::Duplicate(existing);
        }

        if let Some(existing) = self.find_by_filename(filename) {
            return FileStatus::Modified(existing);
        }

        FileStatus::New
    }

    /// Delete a document and its chunks, returning the number of chunks removed
    pub async fn delete_document_with_chunks(&self, doc_id: &Uuid) -> Result<usize> {
        let deleted = self
            .inner
            .vector_store_provider
            .delete_by_document(doc_id)
            .await?;
        self.remove_document(doc_id);
        Ok(deleted)
    }
}

/// Status of an uploaded file for deduplication
#[derive(Debug, Clone)]
pub enum FileStatus {
    /// File is new, process it
    New,
    /// Same filename and content already indexed
    Unchanged(Document),
    /// Same content indexed under another filename
    Duplicate(Document),
    /// Same filename with different content; the old version is replaced
    Modified(Document),
}


#[cfg(test)]
mod tests {
    use super::testing::{config_in, harness};
    use super::*;

    fn doc(name: &str, hash: &str) -> Document {
        Document::new(name.to_string(), hash.to_string(), 10)
    }

    #[test]
    fn test_file_status() {
        let dir = tempfile::tempdir().unwrap();
        let h = harness(config_in(dir.path()));
        let existing = doc("grade.pdf", "abc");
        h.state.add_document(existing.clone());

        assert!(matches!(h.state.check_file_status("new.pdf", "zzz"), FileStatus::New));
        assert!(matches!(
            h.state.check_file_status("grade.pdf", "abc"),
            FileStatus::Unchanged(d) if d.id == existing.id
        ));
        assert!(matches!(
            h.state.check_file_status("copy.pdf", "abc"),
            FileStatus::Duplicate(d) if d.id == existing.id
        ));
        assert!(matches!(
            h.state.check_file_status("grade.pdf", "def"),
            FileStatus::Modified(d) if d.id == existing.id
        ));
    }

    #[test]
    fn test_registry_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let first = harness(config_in(dir.path()));
        let d = doc("grade.pdf", "abc");
        first.state.add_document(d.clone());
        drop(first);

        let second = harness(config_in(dir.path()));
        let loaded = second.state.get_document(&d.id).unwrap();
        assert_eq!(loaded.filename, "grade.pdf");
        assert_eq!(second.state.find_by_hash("abc").unwrap().id, d.id);
    }

    #[test]
    fn test_corrupt_registry_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("documents.json"), "{broken").unwrap();
        let h = harness(config_in(dir.path()));
        assert!(h.state.list_documents().is_empty());
    }

    #[tokio::test]
    async fn test_delete_unknown_document_removes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let h = harness(config_in(dir.path()));
        let deleted = h
            .state
            .delete_document_with_chunks(&Uuid::new_v4())
            .await
            .unwrap();
        assert_eq!(deleted, 0);
    }

    #[test]
    fn test_ready_flag() {
        let dir = tempfile::tempdir().unwrap();
        let h = harness(config_in(dir.path()));
        assert!(h.state.is_ready());
        h.state.set_ready(false);
        assert!(!h.state.is_ready());
    }

    #[tokio::test]
    async fn test_check_backends_tracks_embedder_health() {
        let dir = tempfile::tempdir().unwrap();
        let h = harness(config_in(dir.path()));

        h.embedder.set_failing(true);
        assert!(!h.state.check_backends().await);
        assert!(!h.state.is_ready());

        h.embedder.set_failing(false);
        assert!(h.state.check_backends().await);
        assert!(h.state.is_ready());
    }
}
