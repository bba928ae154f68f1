//! Raw articles as fetched from a source, before normalization

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A fetched article inside its source's freshness window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawArticle {
    /// Article title
    pub title: String,
    /// Body or summary text, HTML already stripped
    pub body: String,
    /// Raw article URL as published by the source
    pub link: String,
    /// Publication time
    pub published_at: DateTime<Utc>,
}
