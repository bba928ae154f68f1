//! Ephemeral per-source vector index and retrieval queries

use tracing::debug;

use newsdesk_core::{Document, MatchResult};

use crate::{
    client::EmbeddingProvider,
    error::Result,
    similarity::cosine_similarity,
    types::{EmbeddingVector, TopicVectors},
};

/// Default number of matches returned per topic per index
pub const DEFAULT_TOP_K: usize = 15;

/// A document paired with its embedding, held only inside one run's index
#[derive(Debug, Clone)]
pub struct IndexEntry {
    pub document: Document,
    pub embedding: EmbeddingVector,
}

/// Exact nearest-neighbor index over one source's document batch
///
/// Built fresh for every source pass and discarded afterwards; never shared
/// across sources or runs. Entries keep insertion order, which also serves
/// as the tie-break for equal similarity scores.
#[derive(Debug, Default)]
pub struct VectorIndex {
    entries: Vec<IndexEntry>,
}

impl VectorIndex {
    /// Embed a batch of documents and index them
    ///
    /// An empty document list produces a valid, queryable empty index.
    pub async fn build(
        provider: &dyn EmbeddingProvider,
        documents: Vec<Document>,
    ) -> Result<Self> {
        let mut entries = Vec::with_capacity(documents.len());

        for document in documents {
            let embedding = provider.embed(&document.embedding_text()).await?;
            entries.push(IndexEntry {
                document,
                embedding,
            });
        }

        debug!("Built vector index with {} entries", entries.len());
        Ok(Self { entries })
    }

    /// Number of indexed documents
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Query the index for each topic independently
    ///
    /// Per topic: cosine similarity against every entry, filtered to
    /// `similarity >= threshold`, top `k` by score (stable sort, so ties
    /// keep insertion order). Rows for distinct topics are concatenated,
    /// not merged or deduplicated.
    pub fn query(&self, topics: &TopicVectors, k: usize, threshold: f64) -> Vec<MatchResult> {
        let mut results = Vec::new();

        for (topic, vector) in topics {
            let mut scored: Vec<(usize, f64)> = self
                .entries
                .iter()
                .enumerate()
                .map(|(position, entry)| (position, cosine_similarity(vector, &entry.embedding)))
                .filter(|(_, score)| *score >= threshold)
                .collect();

            // Stable sort: equal scores keep insertion order
            scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
            scored.truncate(k);

            debug!(
                "Topic {}: {} matches above threshold {}",
                topic,
                scored.len(),
                threshold
            );

            results.extend(scored.into_iter().map(|(position, similarity)| {
                let entry = &self.entries[position];
                MatchResult {
                    topic: topic.clone(),
                    title: entry.document.title.clone(),
                    link: entry.document.link.clone(),
                    similarity,
                }
            }));
        }

        results
    }
}
