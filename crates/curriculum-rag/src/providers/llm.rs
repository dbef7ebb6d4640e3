//! LLM provider trait for generating answers

use async_trait::async_trait;

use crate::error::Result;

/// Trait for grounded answer generation
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Answer a question from the retrieved context
    async fn generate_answer(&self, question: &str, context: &str) -> Result<String>;

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
