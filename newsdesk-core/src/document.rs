//! Normalized documents handed from source adapters to the index builder

use serde::{Deserialize, Serialize};

/// A normalized article from one news source
///
/// Exists only within one source's processing pass; the adapter derives the
/// canonical `link` from the raw article URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Canonical source link, used as the document id
    pub link: String,
    /// Article title
    pub title: String,
    /// Article body or summary text
    pub content: String,
    /// Newspaper/source tag (e.g. "明報")
    pub newspaper: String,
}

impl Document {
    /// Text embedded for this document
    pub fn embedding_text(&self) -> String {
        format!("{} {}", self.title, self.content)
    }
}
