//! Session-scoped topic vector cache

use std::sync::Arc;

use tracing::{debug, info};

use newsdesk_core::LabeledSet;

use crate::{error::ProfileError, profile::TopicProfileBuilder, types::TopicVectors};

/// Caches built topic vectors for the current interactive session
///
/// Keyed by the labeled set's content fingerprint: any change to the rows
/// misses the cache and triggers a full rebuild. `invalidate` forces the
/// next call to rebuild even for an unchanged set.
#[derive(Default)]
pub struct TopicVectorCache {
    cached: Option<(String, Arc<TopicVectors>)>,
}

impl TopicVectorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return cached vectors for this labeled set, building them on miss
    pub async fn get_or_build(
        &mut self,
        builder: &TopicProfileBuilder,
        labeled: &LabeledSet,
    ) -> Result<Arc<TopicVectors>, ProfileError> {
        if let Some((fingerprint, vectors)) = &self.cached {
            if fingerprint == labeled.fingerprint() {
                debug!("Reusing cached topic vectors");
                return Ok(Arc::clone(vectors));
            }
        }

        info!("Building topic vectors for {} categories", labeled.len());
        let vectors = Arc::new(builder.build(labeled).await?);
        self.cached = Some((labeled.fingerprint().to_string(), Arc::clone(&vectors)));
        Ok(vectors)
    }

    /// Whether the cache currently holds vectors for this labeled set
    pub fn is_cached(&self, labeled: &LabeledSet) -> bool {
        matches!(&self.cached, Some((fingerprint, _)) if fingerprint == labeled.fingerprint())
    }

    /// Drop any cached vectors
    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}
