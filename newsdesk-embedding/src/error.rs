//! Error types for embedding and profile operations

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EmbeddingError>;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("OpenAI API error: {0}")]
    OpenAI(#[from] async_openai::error::OpenAIError),

    #[error("No embeddings returned from API")]
    EmptyResponse,

    #[error("Invalid embedding dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors from topic profile building; fatal to the whole run
#[derive(Debug, Error)]
pub enum ProfileError {
    /// A labeled example has an empty summary; a single malformed label
    /// would corrupt the centroid silently, so the whole build fails.
    #[error("Empty summary for labeled example {link} (category {category})")]
    EmptySummary { category: String, link: String },

    /// Positive and negative sums cancel exactly; normalization is
    /// undefined, so fail instead of emitting NaN/Inf.
    #[error("Degenerate topic centroid for category {category}")]
    DegenerateCentroid { category: String },

    #[error("Embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),
}
