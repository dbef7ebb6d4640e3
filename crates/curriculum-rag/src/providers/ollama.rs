//! Ollama-based providers for embeddings and LLM
//!
//! Both wrap a shared [`OllamaClient`].

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::LlmConfig;
use crate::error::Result;
use crate::generation::{OllamaClient, PromptBuilder};
use crate::preprocessing::Locale;

use super::embedding::EmbeddingProvider;
use super::llm::LlmProvider;

/// Ollama embedding provider
pub struct OllamaEmbedder {
    client: Arc<OllamaClient>,
    dimensions: usize,
}

impl OllamaEmbedder {
    /// Create from an existing client
    pub fn from_client(client: Arc<OllamaClient>, dimensions: usize) -> Self {
        Self { client, dimensions }
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.client.embed(text).await
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn health_check(&self) -> Result<bool> {
        self.client.health_check().await
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

/// Ollama LLM provider for answer generation
pub struct OllamaLlm {
    client: Arc<OllamaClient>,
    locale: Locale,
}

impl OllamaLlm {
    /// Create from an existing client; `locale` selects the prompt language
    pub fn from_client(client: Arc<OllamaClient>, locale: Locale) -> Self {
        Self { client, locale }
    }
}

#[async_trait]
impl LlmProvider for OllamaLlm {
    async fn generate_answer(&self, question: &str, context: &str) -> Result<String> {
        let prompt = PromptBuilder::build_rag_prompt(self.locale, question, context);
        self.client.generate(&prompt).await
    }

    async fn health_check(&self) -> Result<bool> {
        self.client.health_check().await
    }

    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        self.client.generate_model()
    }
}

/// Embedder and LLM sharing one HTTP client
pub struct OllamaProvider {
    embedder: OllamaEmbedder,
    llm: OllamaLlm,
}

impl OllamaProvider {
    /// Create both providers from the LLM configuration
    pub fn new(config: &LlmConfig, dimensions: usize, locale: Locale) -> Result<Self> {
        let client = Arc::new(OllamaClient::new(config)?);
        Ok(Self {
            embedder: OllamaEmbedder::from_client(Arc::clone(&client), dimensions),
            llm: OllamaLlm::from_client(client, locale),
        })
    }

    /// Split into separate providers
    pub fn split(self) -> (OllamaEmbedder, OllamaLlm) {
        (self.embedder, self.llm)
    }
}
