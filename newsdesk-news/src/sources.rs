//! Curated production sources

use crate::{
    adapter::{LinkCanonicalization, SourceAdapter},
    rss_source::RssSource,
    sitemap_source::SitemapSource,
    window::FreshnessWindow,
};

/// Mingpao (明報): section RSS feeds, current calendar day in UTC+8
pub fn mingpao() -> RssSource {
    let feeds = [
        "https://news.mingpao.com/rss/pns/s00001.xml", // 要聞
        "https://news.mingpao.com/rss/pns/s00002.xml", // 港聞
        "https://news.mingpao.com/rss/pns/s00003.xml", // 社評
        "https://news.mingpao.com/rss/pns/s00004.xml", // 經濟
        "https://news.mingpao.com/rss/pns/s00005.xml", // 副刊
        "https://news.mingpao.com/rss/pns/s00011.xml", // 教育
        "https://news.mingpao.com/rss/pns/s00012.xml", // 觀點
        "https://news.mingpao.com/rss/pns/s00013.xml", // 中國
        "https://news.mingpao.com/rss/pns/s00014.xml", // 國際
        "https://news.mingpao.com/rss/pns/s00015.xml", // 體育
        "https://news.mingpao.com/rss/pns/s00016.xml", // 娛樂
        "https://news.mingpao.com/rss/pns/s00017.xml", // 英文
        "https://news.mingpao.com/rss/pns/s00018.xml", // 作家專欄
    ];

    RssSource::new(
        "明報",
        feeds.iter().map(|s| s.to_string()).collect(),
        FreshnessWindow::calendar_day(8),
        LinkCanonicalization::StripLastSegment,
    )
}

/// Oriental Daily (東方日報): daily sitemap scrape, UTC+8 calendar day
pub fn oriental() -> SitemapSource {
    SitemapSource::new(
        "東方日報",
        "https://orientaldaily.on.cc",
        "/section/sitemap/",
        FreshnessWindow::calendar_day(8),
        LinkCanonicalization::StripLastSegmentTrailingSlash,
    )
}

/// HK Government press releases (新聞公報): trailing 24 hours, verbatim links
pub fn hkgov() -> RssSource {
    RssSource::new(
        "新聞公報",
        vec!["https://www.info.gov.hk/gia/rss/general_zh.xml".to_string()],
        FreshnessWindow::TrailingHours(24),
        LinkCanonicalization::Verbatim,
    )
}

/// All production sources in their display order
pub fn curated_sources() -> Vec<Box<dyn SourceAdapter>> {
    vec![
        Box::new(mingpao()),
        Box::new(oriental()),
        Box::new(hkgov()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curated_sources_order_and_names() {
        let sources = curated_sources();
        let names: Vec<&str> = sources.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["明報", "東方日報", "新聞公報"]);
    }

    #[test]
    fn test_hkgov_links_stay_verbatim() {
        assert_eq!(
            hkgov().canonicalization(),
            LinkCanonicalization::Verbatim
        );
    }
}
