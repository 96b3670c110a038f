//! Site crawling for the crawler module
//!
//! Composes the link extractor and page scraper into the one-level crawl
//! the ingestion pipeline runs: partition the root page's links, scrape
//! every internal page, and collect the surviving text records.

use tracing::{info, instrument, warn};
use url::Url;

use crate::crawler::config::{CrawlerConfig, LinkFilters};
use crate::crawler::error::CrawlError;
use crate::crawler::links::LinkExtractor;
use crate::crawler::scrape::{PageScraper, ScrapeMode};
use crate::crawler::{PageText, SiteContent};

/// Crawls one site from its root URL
pub struct SiteCrawler {
    extractor: LinkExtractor,
    scraper: PageScraper,
}

impl SiteCrawler {
    /// Create a new crawler with the given configuration
    pub fn new(config: CrawlerConfig) -> Result<Self, CrawlError> {
        Ok(Self {
            extractor: LinkExtractor::new(&config)?,
            scraper: PageScraper::new(&config)?,
        })
    }

    /// Crawl the site rooted at `root_url`
    ///
    /// The internal URL set is the root itself followed by every internal
    /// link found on it, deduplicated. Pages that fail to scrape are
    /// dropped; a failed root extraction yields empty content. Partial
    /// failure never aborts the crawl.
    #[instrument(skip(self))]
    pub async fn crawl(&self, root_url: &str) -> SiteContent {
        let root = match Url::parse(root_url) {
            Ok(url) => url.to_string(),
            Err(e) => {
                warn!(url = root_url, error = %e, "invalid root URL, nothing to crawl");
                return SiteContent::default();
            }
        };

        let partition = match self.extractor.extract(&root, &LinkFilters::default()).await {
            Ok(partition) => partition,
            Err(e) => {
                warn!(url = %root, error = %e, "link extraction failed, nothing to crawl");
                return SiteContent::default();
            }
        };

        let mut internal_urls = vec![root.clone()];
        for record in &partition.internal {
            if !internal_urls.contains(&record.absolute_url) {
                internal_urls.push(record.absolute_url.clone());
            }
        }

        let external_links: Vec<String> = partition
            .external
            .iter()
            .map(|record| record.absolute_url.clone())
            .collect();

        info!(
            internal = internal_urls.len(),
            external = external_links.len(),
            "crawling internal pages"
        );

        let results = self.scraper.scrape_batch(&internal_urls, ScrapeMode::Text).await;

        let mut pages = Vec::new();
        for result in results {
            match result.text {
                Some(text) if result.success => pages.push(PageText {
                    text,
                    url: result.source_url,
                }),
                _ => warn!(
                    url = %result.source_url,
                    error = result.error.as_deref().unwrap_or("no text extracted"),
                    "dropping page"
                ),
            }
        }

        SiteContent {
            pages,
            external_links,
        }
    }
}
