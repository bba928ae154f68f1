//! Match results and per-source result tables

use serde::{Deserialize, Serialize};

/// One retrieved article for one topic
///
/// Rows for different topics covering the same document are independent and
/// never deduplicated. Rows are not mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    /// Topic category the article matched
    pub topic: String,
    /// Article title
    pub title: String,
    /// Canonical article link
    pub link: String,
    /// Cosine similarity to the topic vector, in [-1, 1]
    pub similarity: f64,
}

/// Result table for one source's pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceTable {
    /// Source name (newspaper tag)
    pub source: String,
    /// Match rows, concatenated per topic in query order
    pub matches: Vec<MatchResult>,
    /// Set when the pass failed; the table is then empty
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl SourceTable {
    /// A successful pass with its match rows
    pub fn new(source: impl Into<String>, matches: Vec<MatchResult>) -> Self {
        Self {
            source: source.into(),
            matches,
            warning: None,
        }
    }

    /// A failed pass: empty table plus the reported warning
    pub fn failed(source: impl Into<String>, warning: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            matches: Vec::new(),
            warning: Some(warning.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

/// One run's output: one table per registered source, in registration order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    pub tables: Vec<SourceTable>,
}

impl RunReport {
    /// Total match rows across all sources
    pub fn total_matches(&self) -> usize {
        self.tables.iter().map(|t| t.matches.len()).sum()
    }

    /// Sources whose pass failed, with their warnings
    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tables
            .iter()
            .filter_map(|t| t.warning.as_deref().map(|w| (t.source.as_str(), w)))
    }
}
