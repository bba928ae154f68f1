//! Core types for embeddings

use indexmap::IndexMap;

/// Embedding vector (1536 dimensions for text-embedding-3-small), unit L2 norm
pub type EmbeddingVector = Vec<f32>;

/// Learned topic directions, keyed by category in first-seen order
///
/// Every vector has unit L2 norm, so cosine similarity against an embedding
/// reduces to an inner product.
pub type TopicVectors = IndexMap<String, EmbeddingVector>;
