//! Source adapter interface and link canonicalization

use async_trait::async_trait;

use newsdesk_core::Document;

use crate::{error::NewsError, types::RawArticle};

/// How an adapter derives the canonical source link from a raw article URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkCanonicalization {
    /// Use the raw link verbatim (single-article notice links)
    Verbatim,
    /// Strip the last path segment (RSS-style permalinks)
    StripLastSegment,
    /// Strip the last path segment, keeping a trailing slash
    StripLastSegmentTrailingSlash,
}

impl LinkCanonicalization {
    /// Derive the canonical link
    pub fn apply(&self, link: &str) -> String {
        match self {
            LinkCanonicalization::Verbatim => link.to_string(),
            LinkCanonicalization::StripLastSegment => strip_last_segment(link).to_string(),
            LinkCanonicalization::StripLastSegmentTrailingSlash => {
                format!("{}/", strip_last_segment(link))
            }
        }
    }
}

fn strip_last_segment(link: &str) -> &str {
    match link.rfind('/') {
        Some(pos) => &link[..pos],
        None => link,
    }
}

/// One news source: fetches fresh raw articles and normalizes them
///
/// Each adapter owns its freshness-window policy; `fetch` returns only
/// articles inside the window, so consumers never re-filter.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Newspaper tag used in result rows (e.g. "明報")
    fn name(&self) -> &str;

    /// Canonical-link policy for this source
    fn canonicalization(&self) -> LinkCanonicalization;

    /// Fetch raw articles inside this source's freshness window
    async fn fetch(&self) -> Result<Vec<RawArticle>, NewsError>;

    /// Normalize fetched articles into documents for one pass
    fn normalize(&self, articles: Vec<RawArticle>) -> Vec<Document> {
        articles
            .into_iter()
            .map(|article| Document {
                link: self.canonicalization().apply(&article.link),
                title: article.title,
                content: article.body,
                newspaper: self.name().to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbatim_keeps_link() {
        let link = "https://www.info.gov.hk/gia/general/202506/01/P2025053100123.htm";
        assert_eq!(LinkCanonicalization::Verbatim.apply(link), link);
    }

    #[test]
    fn test_strip_last_segment() {
        assert_eq!(
            LinkCanonicalization::StripLastSegment
                .apply("https://news.example.com/pns/article/web_tc/article/20250601/s00001/1"),
            "https://news.example.com/pns/article/web_tc/article/20250601/s00001"
        );
    }

    #[test]
    fn test_strip_last_segment_trailing_slash() {
        assert_eq!(
            LinkCanonicalization::StripLastSegmentTrailingSlash
                .apply("https://orientaldaily.on.cc/content/news/abc/00174_001"),
            "https://orientaldaily.on.cc/content/news/abc/"
        );
    }

    #[test]
    fn test_strip_without_slash_is_identity() {
        assert_eq!(LinkCanonicalization::StripLastSegment.apply("no-slash"), "no-slash");
    }
}
