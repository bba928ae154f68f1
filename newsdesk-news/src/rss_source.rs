//! RSS/Atom feed adapter
//!
//! Fetches one source's section feeds, strips HTML from summaries, and
//! filters entries to the source's freshness window.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::{
    adapter::{LinkCanonicalization, SourceAdapter},
    error::NewsError,
    html::strip_html,
    types::RawArticle,
    window::FreshnessWindow,
};

/// Backoff before the single retry of a failed feed request
const RETRY_BACKOFF: Duration = Duration::from_secs(3);

/// An RSS/Atom news source built from one or more section feeds
pub struct RssSource {
    name: String,
    feed_urls: Vec<String>,
    window: FreshnessWindow,
    canonicalization: LinkCanonicalization,
    client: Client,
}

impl RssSource {
    pub fn new(
        name: impl Into<String>,
        feed_urls: Vec<String>,
        window: FreshnessWindow,
        canonicalization: LinkCanonicalization,
    ) -> Self {
        Self {
            name: name.into(),
            feed_urls,
            window,
            canonicalization,
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    /// Fetch a URL, retrying once after a short backoff
    async fn fetch_with_retry(&self, url: &str) -> Result<bytes::Bytes, NewsError> {
        match self.request(url).await {
            Ok(content) => Ok(content),
            Err(err) => {
                warn!("Request for {} failed, retrying once: {}", url, err);
                tokio::time::sleep(RETRY_BACKOFF).await;
                self.request(url).await
            }
        }
    }

    async fn request(&self, url: &str) -> Result<bytes::Bytes, NewsError> {
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
            .bytes()
            .await
            .map_err(|e| NewsError::RequestFailed(e.to_string()))
    }

    /// Fetch a single feed, trying RSS first, then Atom
    async fn fetch_feed(&self, url: &str) -> Result<Vec<RawArticle>, NewsError> {
        let content = self.fetch_with_retry(url).await?;

        if let Ok(channel) = rss::Channel::read_from(&content[..]) {
            return Ok(parse_rss_channel(&channel));
        }

        if let Ok(atom_feed) = atom_syndication::Feed::read_from(&content[..]) {
            return Ok(parse_atom_feed(&atom_feed));
        }

        Err(NewsError::ParseError(format!(
            "Failed to parse feed: {}",
            url
        )))
    }
}

#[async_trait]
impl SourceAdapter for RssSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn canonicalization(&self) -> LinkCanonicalization {
        self.canonicalization
    }

    async fn fetch(&self) -> Result<Vec<RawArticle>, NewsError> {
        let mut articles = Vec::new();
        let mut failures = 0;
        let mut last_error = None;

        for url in &self.feed_urls {
            match self.fetch_feed(url).await {
                Ok(entries) => {
                    debug!("Fetched {} entries from {}", entries.len(), url);
                    articles.extend(entries);
                }
                Err(err) => {
                    warn!("Failed to fetch feed {}: {}", url, err);
                    failures += 1;
                    last_error = Some(err);
                }
            }
        }

        if failures == self.feed_urls.len() {
            if let Some(err) = last_error {
                return Err(err);
            }
        }

        let fetched = articles.len();
        let cutoff = self.window.cutoff(Utc::now());
        articles.retain(|article| article.published_at >= cutoff);

        info!(
            "{}: {} of {} fetched articles inside freshness window",
            self.name,
            articles.len(),
            fetched
        );
        Ok(articles)
    }
}

/// Parse an RSS channel; entries without a parseable date are skipped
fn parse_rss_channel(channel: &rss::Channel) -> Vec<RawArticle> {
    channel
        .items()
        .iter()
        .filter_map(|item| {
            let title = item.title()?.to_string();
            let link = item.link()?.to_string();
            let published_at = item
                .pub_date()
                .and_then(|d| DateTime::parse_from_rfc2822(d).ok())
                .map(|d| d.with_timezone(&Utc))?;
            let body = strip_html(item.description().unwrap_or_default());

            Some(RawArticle {
                title,
                body,
                link,
                published_at,
            })
        })
        .collect()
}

/// Parse an Atom feed; entries without a link are skipped
fn parse_atom_feed(atom_feed: &atom_syndication::Feed) -> Vec<RawArticle> {
    atom_feed
        .entries()
        .iter()
        .filter_map(|entry| {
            let title = entry.title().to_string();
            let link = entry.links().first().map(|l| l.href().to_string())?;
            let published_at = entry
                .published()
                .or_else(|| Some(entry.updated()))
                .map(|d| d.with_timezone(&Utc))?;

            let summary_html = entry.summary().map(|s| s.as_str()).unwrap_or_default();
            let content_html = entry.content().and_then(|c| c.value()).unwrap_or_default();
            let body = if !summary_html.is_empty() {
                strip_html(summary_html)
            } else {
                strip_html(content_html)
            };

            Some(RawArticle {
                title,
                body,
                link,
                published_at,
            })
        })
        .collect()
}
