//! News source adapters for the Newsdesk topic retriever
//!
//! This crate provides adapters for fetching fresh articles from:
//! - RSS/Atom feeds: section feeds and government notice feeds
//! - Daily sitemaps: date-stamped section pages scraped per article
//!
//! Each adapter owns its freshness window and its canonical-link policy;
//! downstream consumers receive pre-filtered, normalized documents.

pub mod adapter;
pub mod error;
pub mod html;
pub mod rss_source;
pub mod sitemap_source;
pub mod sources;
pub mod types;
pub mod window;

pub use adapter::{LinkCanonicalization, SourceAdapter};
pub use error::NewsError;
pub use rss_source::RssSource;
pub use sitemap_source::SitemapSource;
pub use sources::{curated_sources, hkgov, mingpao, oriental};
pub use types::RawArticle;
pub use window::FreshnessWindow;
