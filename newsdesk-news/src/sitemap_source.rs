//! Daily sitemap scrape adapter
//!
//! Some sources publish a date-stamped sitemap page listing the day's
//! articles instead of a feed. This adapter fetches that page, extracts the
//! article links, and scrapes each article's paragraph text.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use regex::Regex;
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::{
    adapter::{LinkCanonicalization, SourceAdapter},
    error::NewsError,
    html::{remove_whitespace, strip_html},
    types::RawArticle,
    window::FreshnessWindow,
};

/// Backoff before the single retry of a failed page request
const RETRY_BACKOFF: Duration = Duration::from_secs(3);

/// Adapter for a date-stamped daily sitemap of articles
pub struct SitemapSource {
    name: String,
    /// Site root, prefixed to relative article hrefs
    base_url: String,
    /// Path of the sitemap page; the window's local date (YYYYMMDD) is appended
    sitemap_path: String,
    window: FreshnessWindow,
    canonicalization: LinkCanonicalization,
    client: Client,
}

impl SitemapSource {
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        sitemap_path: impl Into<String>,
        window: FreshnessWindow,
        canonicalization: LinkCanonicalization,
    ) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            sitemap_path: sitemap_path.into(),
            window,
            canonicalization,
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    async fn fetch_with_retry(&self, url: &str) -> Result<String, NewsError> {
        match self.request(url).await {
            Ok(page) => Ok(page),
            Err(err) => {
                warn!("Request for {} failed, retrying once: {}", url, err);
                tokio::time::sleep(RETRY_BACKOFF).await;
                self.request(url).await
            }
        }
    }

    async fn request(&self, url: &str) -> Result<String, NewsError> {
        let response = self
            .client
            .get(url)
            .header("User-Agent", "Newsdesk/1.0")
            .send()
            .await
            .map_err(|e| NewsError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(NewsError::ApiError {
                status: response.status().as_u16(),
                message: format!("Failed to fetch {}", url),
            });
        }

        response
            .text()
            .await
            .map_err(|e| NewsError::RequestFailed(e.to_string()))
    }
}

#[async_trait]
impl SourceAdapter for SitemapSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn canonicalization(&self) -> LinkCanonicalization {
        self.canonicalization
    }

    async fn fetch(&self) -> Result<Vec<RawArticle>, NewsError> {
        let now = Utc::now();
        let date_stamp = self.window.local_date(now).format("%Y%m%d");
        let sitemap_url = format!("{}{}{}", self.base_url, self.sitemap_path, date_stamp);

        let page = self.fetch_with_retry(&sitemap_url).await?;
        let items = extract_sitemap_items(&page)?;
        debug!("{}: sitemap lists {} articles", self.name, items.len());

        let mut articles = Vec::with_capacity(items.len());
        for (title, href) in items {
            let link = if href.starts_with("http") {
                href
            } else {
                format!("{}{}", self.base_url, href)
            };

            let article_html = self.fetch_with_retry(&link).await?;
            let body = extract_paragraph_text(&article_html)?;

            // The sitemap page is already scoped to one local day
            articles.push(RawArticle {
                title,
                body,
                link,
                published_at: now,
            });
        }

        info!("{}: fetched {} articles", self.name, articles.len());
        Ok(articles)
    }
}

/// Extract (title, href) pairs from the sitemap's item list
fn extract_sitemap_items(page: &str) -> Result<Vec<(String, String)>, NewsError> {
    let item_re = Regex::new(r#"(?s)<li[^>]+class="item"[^>]*>(.*?)</li>"#)
        .map_err(|e| NewsError::ParseError(e.to_string()))?;
    let href_re = Regex::new(r#"<a[^>]+href=["']([^"']+)["']"#)
        .map_err(|e| NewsError::ParseError(e.to_string()))?;

    Ok(item_re
        .captures_iter(page)
        .filter_map(|caps| {
            let inner = caps.get(1)?.as_str();
            let href = href_re.captures(inner)?.get(1)?.as_str().to_string();
            let title = strip_html(inner).trim().to_string();
            if title.is_empty() {
                return None;
            }
            Some((title, href))
        })
        .collect())
}

/// Concatenate an article's paragraph blocks, collapsing all whitespace
fn extract_paragraph_text(html: &str) -> Result<String, NewsError> {
    let para_re = Regex::new(r#"(?s)<div[^>]+class="paragraph"[^>]*>(.*?)</div>"#)
        .map_err(|e| NewsError::ParseError(e.to_string()))?;

    let mut content = String::new();
    for caps in para_re.captures_iter(html) {
        if let Some(inner) = caps.get(1) {
            content.push_str(&strip_html(inner.as_str()));
        }
    }

    Ok(remove_whitespace(&content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_sitemap_items() {
        let page = r#"
            <ul>
                <li class="item"><a href="/content/news/20250601/00174_001">本港失業率回落</a></li>
                <li class="item"><a href="/content/news/20250601/00174_002">立法會通過新條例</a></li>
                <li class="other"><a href="/ads">ignore me</a></li>
            </ul>"#;

        let items = extract_sitemap_items(page).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].0, "本港失業率回落");
        assert_eq!(items[0].1, "/content/news/20250601/00174_001");
    }

    #[test]
    fn test_extract_paragraph_text_collapses_whitespace() {
        let html = r#"
            <div class="paragraph">政府 昨日公布</div>
            <div class="sidebar">ignore</div>
            <div class="paragraph">新措施
            詳情</div>"#;

        let text = extract_paragraph_text(html).unwrap();
        assert_eq!(text, "政府昨日公布新措施詳情");
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_fetch_live_sitemap() {
        let source = SitemapSource::new(
            "東方日報",
            "https://orientaldaily.on.cc",
            "/section/sitemap/",
            FreshnessWindow::calendar_day(8),
            LinkCanonicalization::StripLastSegmentTrailingSlash,
        );
        let articles = source.fetch().await.expect("fetch failed");
        for article in &articles {
            assert!(article.link.starts_with("https://orientaldaily.on.cc"));
        }
    }
}
