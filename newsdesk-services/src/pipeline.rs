//! Retrieval pipeline: topic vectors once, one isolated pass per source

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use newsdesk_core::{LabeledSet, RunReport, SourceTable};
use newsdesk_embedding::{
    DEFAULT_TOP_K, EmbeddingError, EmbeddingProvider, ProfileError, TopicProfileBuilder,
    TopicVectorCache, TopicVectors, VectorIndex,
};
use newsdesk_news::{NewsError, SourceAdapter};

/// Configuration for retrieval runs
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Maximum matches per (topic, source)
    pub top_k: usize,
    /// Minimum cosine similarity for a match; one value threaded through
    /// every source pass
    pub similarity_threshold: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            similarity_threshold: 0.7,
        }
    }
}

/// A failure inside one source's pass; isolated to that source
#[derive(Debug, Error)]
pub enum SourcePassError {
    #[error(transparent)]
    Fetch(#[from] NewsError),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),
}

/// Drives one interactive run across all registered sources
///
/// The embedding provider is constructed once at process start and shared
/// read-only; the topic-vector cache is session-scoped and keyed by the
/// labeled set's fingerprint.
pub struct RetrievalPipeline {
    provider: Arc<dyn EmbeddingProvider>,
    builder: TopicProfileBuilder,
    cache: TopicVectorCache,
    sources: Vec<Box<dyn SourceAdapter>>,
    config: PipelineConfig,
}

impl RetrievalPipeline {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, sources: Vec<Box<dyn SourceAdapter>>) -> Self {
        Self::with_config(provider, sources, PipelineConfig::default())
    }

    pub fn with_config(
        provider: Arc<dyn EmbeddingProvider>,
        sources: Vec<Box<dyn SourceAdapter>>,
        config: PipelineConfig,
    ) -> Self {
        let builder = TopicProfileBuilder::new(Arc::clone(&provider));
        Self {
            provider,
            builder,
            cache: TopicVectorCache::new(),
            sources,
            config,
        }
    }

    /// Change the similarity threshold for subsequent runs
    pub fn set_similarity_threshold(&mut self, threshold: f64) {
        self.config.similarity_threshold = threshold;
    }

    /// Drop cached topic vectors, forcing a rebuild on the next run
    pub fn refresh_topic_vectors(&mut self) {
        self.cache.invalidate();
    }

    /// Run retrieval for the current labeled set
    ///
    /// A profile error aborts the whole run, since every source depends on
    /// the same topic vectors. A fetch or embedding failure in one source
    /// becomes an empty table plus a warning and never touches its siblings.
    pub async fn run(&mut self, labeled: &LabeledSet) -> Result<RunReport, ProfileError> {
        let topics = self.cache.get_or_build(&self.builder, labeled).await?;

        let mut report = RunReport::default();
        for source in &self.sources {
            let table = match self.run_source(source.as_ref(), &topics).await {
                Ok(table) => table,
                Err(err) => {
                    warn!("Source {} failed: {}", source.name(), err);
                    SourceTable::failed(source.name(), err.to_string())
                }
            };
            report.tables.push(table);
        }

        info!(
            "Run complete: {} matches across {} sources",
            report.total_matches(),
            report.tables.len()
        );
        Ok(report)
    }

    /// One source's pass: fetch → normalize → index → query
    async fn run_source(
        &self,
        source: &dyn SourceAdapter,
        topics: &TopicVectors,
    ) -> Result<SourceTable, SourcePassError> {
        info!("Processing source {}", source.name());

        let articles = source.fetch().await?;
        let documents = source.normalize(articles);
        let index = VectorIndex::build(self.provider.as_ref(), documents).await?;
        let matches = index.query(topics, self.config.top_k, self.config.similarity_threshold);

        info!("{}: {} matches", source.name(), matches.len());
        Ok(SourceTable::new(source.name(), matches))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::Utc;

    use newsdesk_core::LabeledExample;
    use newsdesk_embedding::{EmbeddingVector, Result as EmbeddingResult};
    use newsdesk_news::{LinkCanonicalization, RawArticle};

    use super::*;

    struct FakeProvider {
        map: HashMap<String, Vec<f32>>,
        calls: AtomicUsize,
    }

    impl FakeProvider {
        fn new(entries: &[(&str, Vec<f32>)]) -> Arc<Self> {
            Arc::new(Self {
                map: entries
                    .iter()
                    .map(|(text, v)| (text.to_string(), v.clone()))
                    .collect(),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl EmbeddingProvider for FakeProvider {
        async fn embed(&self, text: &str) -> EmbeddingResult<EmbeddingVector> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.map.get(text).cloned().ok_or_else(|| {
                EmbeddingError::Config(format!("no fake embedding for: {}", text))
            })
        }

        fn dimension(&self) -> usize {
            3
        }
    }

    struct FakeAdapter {
        name: String,
        articles: Vec<RawArticle>,
        fail: bool,
    }

    impl FakeAdapter {
        fn with_articles(name: &str, articles: Vec<RawArticle>) -> Box<Self> {
            Box::new(Self {
                name: name.to_string(),
                articles,
                fail: false,
            })
        }

        fn failing(name: &str) -> Box<Self> {
            Box::new(Self {
                name: name.to_string(),
                articles: Vec::new(),
                fail: true,
            })
        }
    }

    #[async_trait]
    impl SourceAdapter for FakeAdapter {
        fn name(&self) -> &str {
            &self.name
        }

        fn canonicalization(&self) -> LinkCanonicalization {
            LinkCanonicalization::Verbatim
        }

        async fn fetch(&self) -> Result<Vec<RawArticle>, NewsError> {
            if self.fail {
                Err(NewsError::RequestFailed("connection reset".to_string()))
            } else {
                Ok(self.articles.clone())
            }
        }
    }

    fn article(link: &str, title: &str, body: &str) -> RawArticle {
        RawArticle {
            title: title.to_string(),
            body: body.to_string(),
            link: link.to_string(),
            published_at: Utc::now(),
        }
    }

    fn example(category: &str, negative: bool, link: &str, summary: &str) -> LabeledExample {
        LabeledExample {
            category: category.to_string(),
            negative,
            link: link.to_string(),
            title: link.to_string(),
            summary: summary.to_string(),
        }
    }

    /// Politics topic from positives A, B and negative C; one matching document
    fn politics_fixture() -> (Arc<FakeProvider>, LabeledSet) {
        let provider = FakeProvider::new(&[
            ("a A", vec![1.0, 0.0, 0.0]),
            ("b B", vec![0.0, 1.0, 0.0]),
            ("c C", vec![0.0, 0.0, 1.0]),
            // Document embedding identical to positive example A
            ("doc a A", vec![1.0, 0.0, 0.0]),
            ("dud D", vec![0.0, 0.0, 1.0]),
        ]);
        let labeled = LabeledSet::new(vec![
            example("Politics", false, "a", "A"),
            example("Politics", false, "b", "B"),
            example("Politics", true, "c", "C"),
        ]);
        (provider, labeled)
    }

    #[tokio::test]
    async fn test_matching_document_is_retrieved_above_threshold() {
        let (provider, labeled) = politics_fixture();
        let sources: Vec<Box<dyn SourceAdapter>> = vec![FakeAdapter::with_articles(
            "明報",
            vec![article("l1", "doc a", "A")],
        )];
        let mut pipeline = RetrievalPipeline::with_config(
            provider,
            sources,
            PipelineConfig {
                top_k: DEFAULT_TOP_K,
                similarity_threshold: 0.5,
            },
        );

        let report = pipeline.run(&labeled).await.unwrap();
        assert_eq!(report.tables.len(), 1);
        let matches = &report.tables[0].matches;
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].topic, "Politics");
        assert!(matches[0].similarity > 0.5);
    }

    #[tokio::test]
    async fn test_empty_source_yields_empty_table_and_siblings_still_run() {
        let (provider, labeled) = politics_fixture();
        let sources: Vec<Box<dyn SourceAdapter>> = vec![
            FakeAdapter::with_articles("東方日報", vec![]),
            FakeAdapter::with_articles("明報", vec![article("l1", "doc a", "A")]),
        ];
        let mut pipeline = RetrievalPipeline::with_config(
            provider,
            sources,
            PipelineConfig {
                top_k: DEFAULT_TOP_K,
                similarity_threshold: 0.5,
            },
        );

        let report = pipeline.run(&labeled).await.unwrap();
        assert_eq!(report.tables.len(), 2);
        assert!(report.tables[0].is_empty());
        assert!(report.tables[0].warning.is_none());
        assert_eq!(report.tables[1].matches.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_source_is_isolated_with_warning() {
        let (provider, labeled) = politics_fixture();
        let sources: Vec<Box<dyn SourceAdapter>> = vec![
            FakeAdapter::failing("東方日報"),
            FakeAdapter::with_articles("明報", vec![article("l1", "doc a", "A")]),
        ];
        let mut pipeline = RetrievalPipeline::with_config(
            provider,
            sources,
            PipelineConfig {
                top_k: DEFAULT_TOP_K,
                similarity_threshold: 0.5,
            },
        );

        let report = pipeline.run(&labeled).await.unwrap();
        assert_eq!(report.tables.len(), 2);
        assert!(report.tables[0].is_empty());
        assert!(report.tables[0].warning.is_some());
        assert_eq!(report.tables[1].matches.len(), 1);
    }

    #[tokio::test]
    async fn test_threshold_one_yields_no_matches_for_inexact_documents() {
        let (provider, labeled) = politics_fixture();
        // "dud D" embeds to the negative direction, far from the topic vector
        let sources: Vec<Box<dyn SourceAdapter>> = vec![FakeAdapter::with_articles(
            "明報",
            vec![article("l1", "dud", "D")],
        )];
        let mut pipeline = RetrievalPipeline::with_config(
            provider,
            sources,
            PipelineConfig {
                top_k: DEFAULT_TOP_K,
                similarity_threshold: 1.0,
            },
        );

        let report = pipeline.run(&labeled).await.unwrap();
        assert!(report.tables[0].is_empty());
        assert!(report.tables[0].warning.is_none());
    }

    #[tokio::test]
    async fn test_profile_error_aborts_whole_run() {
        let (provider, _) = politics_fixture();
        let labeled = LabeledSet::new(vec![example("Politics", false, "a", "")]);
        let sources: Vec<Box<dyn SourceAdapter>> = vec![FakeAdapter::with_articles(
            "明報",
            vec![article("l1", "doc a", "A")],
        )];
        let mut pipeline = RetrievalPipeline::new(provider, sources);

        assert!(matches!(
            pipeline.run(&labeled).await,
            Err(ProfileError::EmptySummary { .. })
        ));
    }

    #[tokio::test]
    async fn test_topic_vectors_are_cached_across_runs() {
        let (provider, labeled) = politics_fixture();
        let sources: Vec<Box<dyn SourceAdapter>> = vec![FakeAdapter::with_articles("明報", vec![])];
        let mut pipeline = RetrievalPipeline::new(provider.clone(), sources);

        pipeline.run(&labeled).await.unwrap();
        let after_first = provider.calls.load(Ordering::SeqCst);
        pipeline.run(&labeled).await.unwrap();

        // Second run reuses cached topic vectors: no new labeled-set embeds
        assert_eq!(provider.calls.load(Ordering::SeqCst), after_first);

        pipeline.refresh_topic_vectors();
        pipeline.run(&labeled).await.unwrap();
        assert!(provider.calls.load(Ordering::SeqCst) > after_first);
    }
}
