//! Embedding provider interface and OpenAI-backed client

use std::time::Duration;

use async_openai::{
    Client,
    config::OpenAIConfig,
    types::embeddings::{CreateEmbeddingRequest, EmbeddingInput},
};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::{error::Result, similarity::l2_normalize, types::EmbeddingVector};

/// Backoff before the single retry of a failed embedding request
const RETRY_BACKOFF: Duration = Duration::from_secs(3);

/// Maps text to a fixed-dimension, unit-norm dense vector
///
/// Deterministic for a fixed model/version. Constructed once at process
/// start and shared read-only (`Arc<dyn EmbeddingProvider>`) by the profile
/// builder and every index build for the process lifetime.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed arbitrary text
    async fn embed(&self, text: &str) -> Result<EmbeddingVector>;

    /// Fixed output dimension D
    fn dimension(&self) -> usize;
}

/// OpenAI embedding client
pub struct EmbeddingClient {
    client: Client<OpenAIConfig>,
    model: String,
    dimension: usize,
}

impl EmbeddingClient {
    /// Create a new embedding client
    ///
    /// Uses text-embedding-3-small model (1536 dimensions)
    pub fn new(api_key: String) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key);
        Self {
            client: Client::with_config(config),
            model: "text-embedding-3-small".to_string(),
            dimension: 1536,
        }
    }

    /// Low-level embedding generation with a single bounded retry
    async fn generate_embedding(&self, text: &str) -> Result<EmbeddingVector> {
        let request = || CreateEmbeddingRequest {
            model: self.model.clone(),
            input: EmbeddingInput::String(text.to_string()),
            encoding_format: None,
            dimensions: None,
            user: None,
        };

        let response = match self.client.embeddings().create(request()).await {
            Ok(response) => response,
            Err(err) => {
                warn!("Embedding request failed, retrying once: {}", err);
                tokio::time::sleep(RETRY_BACKOFF).await;
                self.client.embeddings().create(request()).await?
            }
        };

        if response.data.is_empty() {
            return Err(crate::error::EmbeddingError::EmptyResponse);
        }

        let embedding = response.data[0].embedding.clone();

        // Validate dimension
        if embedding.len() != self.dimension {
            return Err(crate::error::EmbeddingError::InvalidDimension {
                expected: self.dimension,
                actual: embedding.len(),
            });
        }

        debug!(
            "Generated embedding: dimension={}, model={}",
            embedding.len(),
            self.model
        );

        // The model returns unit-norm vectors; renormalize so cosine
        // similarity always reduces to an inner product downstream.
        Ok(l2_normalize(embedding))
    }

    /// Get the embedding model name
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl EmbeddingProvider for EmbeddingClient {
    async fn embed(&self, text: &str) -> Result<EmbeddingVector> {
        self.generate_embedding(text).await
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::l2_norm;

    #[tokio::test]
    #[ignore] // Requires API key
    async fn test_embed_text() {
        let api_key = std::env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY not set");
        let client = EmbeddingClient::new(api_key);

        let embedding = client
            .embed("特首發表施政報告 聚焦房屋土地供應")
            .await
            .expect("Failed to generate embedding");

        assert_eq!(embedding.len(), 1536);
        assert!((l2_norm(&embedding) - 1.0).abs() < 1e-3);
    }
}
