//! Website crawler module
//!
//! This module provides functionality for discovering the links of a site,
//! scraping visible text from its pages, and assembling the per-page text
//! records that feed the ingestion pipeline.

mod config;
mod error;
mod links;
mod scrape;
mod site;

pub use config::{CrawlerConfig, CrawlerConfigBuilder, LinkFilters, LinkSelection};
pub use error::CrawlError;
pub use links::{COMMON_FILE_EXTENSIONS, LinkExtractor, extract_links_from_html, partition_links};
pub use scrape::{PageScraper, ScrapeMode, extract_structured, extract_text};
pub use site::SiteCrawler;

use serde::{Deserialize, Serialize};

/// A single hyperlink found on a page
///
/// `absolute_url` is always fully resolved against the page it was found on;
/// `is_internal` compares the network location (host plus explicit port) of
/// the resolved URL with the source page's, case-insensitively and exactly,
/// so subdomains count as external.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkRecord {
    /// Fully resolved URL
    pub absolute_url: String,

    /// The href attribute as written in the document
    pub original_href: String,

    /// Visible text of the anchor
    pub link_text: String,

    /// The title attribute, empty when absent
    pub title: String,

    /// The target attribute, empty when absent
    pub target: String,

    /// Whether the link points at the source page's network location
    pub is_internal: bool,

    /// Whether the raw href carried no network location
    pub is_relative: bool,
}

/// The deduplicated, filtered links of one page, partitioned by locality
///
/// Invariant: `internal` and `external` are disjoint and together equal
/// `all`, which preserves first-seen order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkPartition {
    /// The page the links were extracted from
    pub source_url: String,

    /// Every unique link that survived filtering, in first-seen order
    pub all: Vec<LinkRecord>,

    /// Links on the same network location as the source page
    pub internal: Vec<LinkRecord>,

    /// Links on a different network location
    pub external: Vec<LinkRecord>,
}

/// The outcome of scraping one page
///
/// `success == false` implies `text` and `structured` are absent and
/// `error` is populated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeResult {
    /// The page that was scraped
    pub source_url: String,

    /// Whether the page was fetched and parsed
    pub success: bool,

    /// Normalized visible text of the page
    pub text: Option<String>,

    /// Structured fields, present only in structured mode
    pub structured: Option<StructuredPage>,

    /// Description of the failure when `success` is false
    pub error: Option<String>,
}

impl ScrapeResult {
    pub(crate) fn failure(source_url: &str, error: String) -> Self {
        Self {
            source_url: source_url.to_string(),
            success: false,
            text: None,
            structured: None,
            error: Some(error),
        }
    }
}

/// Structured fields extracted from a page's cleaned DOM
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StructuredPage {
    /// Contents of the title element
    pub title: String,

    /// Contents of the meta description, empty when absent
    pub meta_description: String,

    /// Headings in document order
    pub headings: Vec<Heading>,

    /// Non-empty paragraph texts in document order
    pub paragraphs: Vec<String>,

    /// Anchors with their raw hrefs
    pub links: Vec<StructuredLink>,

    /// Images with their alt text
    pub images: Vec<ImageRef>,
}

/// A heading with its level tag (`h1`..`h6`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Heading {
    pub level: String,
    pub text: String,
}

/// An anchor as it appears in the document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredLink {
    pub text: String,
    pub href: String,
}

/// An image reference with alt text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRef {
    pub alt: String,
    pub src: String,
}

/// One successfully scraped page's text, the unit fed into chunking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageText {
    /// Normalized visible text
    pub text: String,

    /// The page the text came from
    pub url: String,
}

/// Everything the site crawler produced for one root URL
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteContent {
    /// Text records for every internal page that scraped successfully
    pub pages: Vec<PageText>,

    /// External links discovered on the root page
    pub external_links: Vec<String>,
}

/// Fetch a page and return its body, failing on network or status errors
pub(crate) async fn fetch_page(
    client: &reqwest::Client,
    url: &str,
) -> Result<String, CrawlError> {
    let response = client.get(url).send().await?.error_for_status()?;
    Ok(response.text().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrape_failure_shape() {
        let result = ScrapeResult::failure("https://example.com", "timed out".to_string());

        assert!(!result.success);
        assert!(result.text.is_none());
        assert!(result.structured.is_none());
        assert_eq!(result.error.as_deref(), Some("timed out"));
    }
}
