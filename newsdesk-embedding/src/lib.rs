//! Embedding and semantic topic matching for news retrieval
//!
//! This crate provides the numeric core of the retriever: topic vectors
//! learned from labeled examples via a contrastive centroid, and ephemeral
//! per-source vector indices queried by cosine similarity.
//!
//! ## Features
//! - Generate embeddings via OpenAI's text-embedding-3-small model
//! - Build unit-norm topic vectors from positive/negative labeled examples
//! - Cache topic vectors per labeled-set fingerprint within a session
//! - Build an in-memory index per source batch and run threshold/top-k queries

pub mod cache;
pub mod client;
pub mod error;
pub mod index;
pub mod profile;
pub mod similarity;
pub mod types;

pub use cache::TopicVectorCache;
pub use client::{EmbeddingClient, EmbeddingProvider};
pub use error::{EmbeddingError, ProfileError, Result};
pub use index::{DEFAULT_TOP_K, IndexEntry, VectorIndex};
pub use profile::TopicProfileBuilder;
pub use similarity::{cosine_similarity, l2_norm, l2_normalize};
pub use types::{EmbeddingVector, TopicVectors};
