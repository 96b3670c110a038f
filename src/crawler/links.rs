//! Link extraction for the crawler module
//!
//! One parse pass over a fetched page collects every anchor into a
//! [`LinkRecord`], then a filter chain, deduplication and an
//! internal/external partition produce the [`LinkPartition`] the site
//! crawler works from.

use std::collections::HashSet;

use scraper::{Html, Selector};
use tracing::{debug, instrument};
use url::Url;

use crate::crawler::config::{CrawlerConfig, LinkFilters, LinkSelection};
use crate::crawler::error::CrawlError;
use crate::crawler::{LinkPartition, LinkRecord, fetch_page};

/// Href prefixes that never produce a crawlable link
const SKIP_PREFIXES: [&str; 4] = ["javascript:", "mailto:", "tel:", "#"];

/// Extensions excluded by default: documents, archives, images, audio,
/// video, stylesheets and scripts
pub const COMMON_FILE_EXTENSIONS: [&str; 22] = [
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "zip", "rar", "tar", "gz", "jpg", "jpeg",
    "png", "gif", "svg", "mp4", "mp3", "avi", "mov", "css", "js",
];

/// Extracts and classifies the links of a single page
///
/// Owns its HTTP client; the client carries the configured timeout and the
/// identifying user agent on every request.
pub struct LinkExtractor {
    client: reqwest::Client,
}

impl LinkExtractor {
    /// Create a new extractor with the given network policy
    pub fn new(config: &CrawlerConfig) -> Result<Self, CrawlError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { client })
    }

    /// Fetch a page and return its filtered, deduplicated link partition
    ///
    /// # Arguments
    ///
    /// * `page_url` - The page to extract links from
    /// * `filters` - The filter chain to apply before partitioning
    #[instrument(skip(self, filters))]
    pub async fn extract(
        &self,
        page_url: &str,
        filters: &LinkFilters,
    ) -> Result<LinkPartition, CrawlError> {
        let base = Url::parse(page_url)?;
        let html = fetch_page(&self.client, page_url).await?;

        let records = extract_links_from_html(&html, &base);
        debug!(count = records.len(), "extracted anchors");

        Ok(partition_links(page_url, records, filters))
    }
}

/// Collect one [`LinkRecord`] per usable anchor in the document
///
/// Empty hrefs and `javascript:`/`mailto:`/`tel:`/`#` values are skipped,
/// as are anchors whose href cannot be resolved against `base`.
pub fn extract_links_from_html(html: &str, base: &Url) -> Vec<LinkRecord> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let base_netloc = netloc(base);
    let mut records = Vec::new();

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let href = href.trim();
        if href.is_empty() || SKIP_PREFIXES.iter().any(|prefix| href.starts_with(prefix)) {
            continue;
        }

        let Ok(absolute) = base.join(href) else {
            continue;
        };

        let link_text = element.text().collect::<String>().trim().to_string();
        let title = element.value().attr("title").unwrap_or_default().to_string();
        let target = element
            .value()
            .attr("target")
            .unwrap_or_default()
            .to_string();
        let is_relative = match Url::parse(href) {
            Ok(parsed) => parsed.host_str().is_none(),
            Err(_) => true,
        };

        records.push(LinkRecord {
            absolute_url: absolute.to_string(),
            original_href: href.to_string(),
            link_text,
            title,
            target,
            is_internal: netloc(&absolute) == base_netloc,
            is_relative,
        });
    }

    records
}

/// Filter, deduplicate and partition extracted links
///
/// Deduplication is by absolute URL and preserves first-seen order; the
/// resulting unique set is split exhaustively into internal and external.
pub fn partition_links(
    source_url: &str,
    records: Vec<LinkRecord>,
    filters: &LinkFilters,
) -> LinkPartition {
    let filtered = apply_filters(records, filters);

    let mut seen = HashSet::new();
    let mut all = Vec::new();
    for record in filtered {
        if seen.insert(record.absolute_url.clone()) {
            all.push(record);
        }
    }

    let (internal, external): (Vec<_>, Vec<_>) =
        all.iter().cloned().partition(|record| record.is_internal);

    LinkPartition {
        source_url: source_url.to_string(),
        all,
        internal,
        external,
    }
}

/// Apply the filter chain in its contract order: selection, include
/// pattern, exclude pattern, explicit extensions, default extensions
fn apply_filters(records: Vec<LinkRecord>, filters: &LinkFilters) -> Vec<LinkRecord> {
    let mut filtered = records;

    match filters.selection {
        LinkSelection::All => {}
        LinkSelection::InternalOnly => filtered.retain(|record| record.is_internal),
        LinkSelection::ExternalOnly => filtered.retain(|record| !record.is_internal),
    }

    if let Some(pattern) = &filters.include_pattern {
        filtered.retain(|record| pattern.is_match(&record.absolute_url));
    }

    if let Some(pattern) = &filters.exclude_pattern {
        filtered.retain(|record| !pattern.is_match(&record.absolute_url));
    }

    for extension in &filters.exclude_extensions {
        let suffix = format!(".{}", extension.to_ascii_lowercase());
        filtered.retain(|record| !record.absolute_url.to_ascii_lowercase().ends_with(&suffix));
    }

    if filters.exclude_common_files {
        for extension in COMMON_FILE_EXTENSIONS {
            let suffix = format!(".{}", extension);
            filtered.retain(|record| !record.absolute_url.to_ascii_lowercase().ends_with(&suffix));
        }
    }

    filtered
}

/// Lowercased network location of a URL: host plus explicit port
fn netloc(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host,
    }
}
