//! Topic profile builder: contrastive centroids from labeled examples

use std::sync::Arc;

use ndarray::{Array1, ArrayView1};
use tracing::{debug, info};

use newsdesk_core::{LabeledExample, LabeledSet};

use crate::{client::EmbeddingProvider, error::ProfileError, types::TopicVectors};

/// Builds one unit-norm topic vector per category from a labeled set
///
/// Per category: embed `title + " " + summary` for every example, sum the
/// positive and negative subsets element-wise, subtract the negative sum
/// from the positive sum, and normalize to unit length.
pub struct TopicProfileBuilder {
    provider: Arc<dyn EmbeddingProvider>,
}

impl TopicProfileBuilder {
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self { provider }
    }

    /// Build topic vectors for every category in the set
    ///
    /// Recomputes every category from scratch on each call; there is no
    /// incremental update. Vector summation commutes, so the output does
    /// not depend on row order within a category.
    pub async fn build(&self, labeled: &LabeledSet) -> Result<TopicVectors, ProfileError> {
        let mut topics = TopicVectors::new();

        for (category, group) in labeled.groups() {
            debug!(
                "Building topic vector for category {} ({} positive, {} negative)",
                category,
                group.positives.len(),
                group.negatives.len()
            );

            let positive_sum = self.sum_embeddings(category, &group.positives).await?;
            let negative_sum = self.sum_embeddings(category, &group.negatives).await?;

            let centroid = positive_sum - negative_sum;
            let norm = centroid.dot(&centroid).sqrt();
            if norm == 0.0 || !norm.is_finite() {
                return Err(ProfileError::DegenerateCentroid {
                    category: category.to_string(),
                });
            }

            topics.insert(category.to_string(), (centroid / norm).to_vec());
        }

        info!("Built {} topic vectors", topics.len());
        Ok(topics)
    }

    /// Element-wise sum (not mean) of one subset's embeddings
    async fn sum_embeddings(
        &self,
        category: &str,
        examples: &[LabeledExample],
    ) -> Result<Array1<f32>, ProfileError> {
        let mut sum = Array1::<f32>::zeros(self.provider.dimension());

        for example in examples {
            if example.summary.is_empty() {
                return Err(ProfileError::EmptySummary {
                    category: category.to_string(),
                    link: example.link.clone(),
                });
            }
            let embedding = self.provider.embed(&example.embedding_text()).await?;
            sum += &ArrayView1::from(embedding.as_slice());
        }

        Ok(sum)
    }
}
