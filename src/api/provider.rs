use crate::core::error::ProviderError;
use async_trait::async_trait;

/// Turns text into fixed-length vectors.
///
/// Corpus and query embeddings must come from the same implementation and
/// model; vectors from different models are not comparable.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single query string
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, ProviderError>;

    /// Embed a batch of documents, returning vectors in input order
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError>;
}

/// Single-turn text completion
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError>;
}
