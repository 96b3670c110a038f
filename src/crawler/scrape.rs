//! Page scraping for the crawler module
//!
//! Fetches a page and reduces it to normalized visible text, skipping the
//! non-content parts of the document (scripts, styles, navigation, header,
//! footer, aside). Structured mode additionally extracts title, meta
//! description, headings, paragraphs, links and images from the same
//! cleaned tree.

use ego_tree::NodeRef;
use scraper::{ElementRef, Html, Node, Selector};
use tracing::{debug, instrument, warn};

use crate::crawler::config::CrawlerConfig;
use crate::crawler::error::CrawlError;
use crate::crawler::{
    Heading, ImageRef, ScrapeResult, StructuredLink, StructuredPage, fetch_page,
};

/// Elements whose subtrees never contribute visible content
const NON_CONTENT_TAGS: [&str; 6] = ["script", "style", "nav", "header", "footer", "aside"];

/// What to extract from each scraped page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrapeMode {
    /// Normalized visible text only
    Text,

    /// Visible text plus structured fields
    Structured,
}

/// Fetches pages and extracts their content
///
/// Owns its HTTP client and the politeness delay applied between the
/// requests of a batch.
pub struct PageScraper {
    client: reqwest::Client,
    delay: std::time::Duration,
}

impl PageScraper {
    /// Create a new scraper with the given network policy
    pub fn new(config: &CrawlerConfig) -> Result<Self, CrawlError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            delay: config.politeness_delay(),
        })
    }

    /// Scrape a single page
    ///
    /// Fetch failures are reported in the result rather than returned as an
    /// error, so batch callers can continue with partial data.
    #[instrument(skip(self))]
    pub async fn scrape(&self, url: &str, mode: ScrapeMode) -> ScrapeResult {
        let html = match fetch_page(&self.client, url).await {
            Ok(html) => html,
            Err(e) => {
                warn!(url, error = %e, "failed to fetch page");
                return ScrapeResult::failure(url, e.to_string());
            }
        };

        let text = extract_text(&html);
        debug!(url, text_length = text.len(), "scraped page");

        ScrapeResult {
            source_url: url.to_string(),
            success: true,
            text: Some(text),
            structured: match mode {
                ScrapeMode::Text => None,
                ScrapeMode::Structured => Some(extract_structured(&html)),
            },
            error: None,
        }
    }

    /// Scrape a batch of pages sequentially
    ///
    /// The politeness delay is applied between requests, not before the
    /// first or after the last.
    #[instrument(skip(self, urls), fields(count = urls.len()))]
    pub async fn scrape_batch(&self, urls: &[String], mode: ScrapeMode) -> Vec<ScrapeResult> {
        let mut results = Vec::with_capacity(urls.len());

        for (i, url) in urls.iter().enumerate() {
            if i > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            results.push(self.scrape(url, mode).await);
        }

        results
    }
}

/// Extract the normalized visible text of a document
///
/// Text nodes inside non-content subtrees are dropped; every remaining run
/// of whitespace collapses to a single space and the result is trimmed, so
/// the output never contains two adjacent whitespace characters.
pub fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let mut raw = String::new();
    collect_text(&document.root_element(), &mut raw);

    normalize_whitespace(&raw)
}

fn collect_text(node: &NodeRef<'_, Node>, out: &mut String) {
    for child in node.children() {
        match child.value() {
            Node::Text(text) => {
                out.push_str(text);
                out.push(' ');
            }
            Node::Element(element) => {
                if !NON_CONTENT_TAGS.contains(&element.name()) {
                    collect_text(&child, out);
                }
            }
            _ => {}
        }
    }
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extract the structured fields of a document from its cleaned tree
pub fn extract_structured(html: &str) -> StructuredPage {
    let document = Html::parse_document(html);
    let mut page = StructuredPage::default();

    if let Some(title) = select_first(&document, "title") {
        page.title = normalize_whitespace(&title.text().collect::<String>());
    }

    if let Some(meta) = select_first(&document, r#"meta[name="description"]"#) {
        page.meta_description = meta
            .value()
            .attr("content")
            .unwrap_or_default()
            .trim()
            .to_string();
    }

    for heading in select_content(&document, "h1, h2, h3, h4, h5, h6") {
        page.headings.push(Heading {
            level: heading.value().name().to_string(),
            text: normalize_whitespace(&heading.text().collect::<String>()),
        });
    }

    for paragraph in select_content(&document, "p") {
        let text = normalize_whitespace(&paragraph.text().collect::<String>());
        if !text.is_empty() {
            page.paragraphs.push(text);
        }
    }

    for anchor in select_content(&document, "a[href]") {
        page.links.push(StructuredLink {
            text: normalize_whitespace(&anchor.text().collect::<String>()),
            href: anchor.value().attr("href").unwrap_or_default().to_string(),
        });
    }

    for image in select_content(&document, "img[src]") {
        page.images.push(ImageRef {
            alt: image.value().attr("alt").unwrap_or_default().to_string(),
            src: image.value().attr("src").unwrap_or_default().to_string(),
        });
    }

    page
}

fn select_first<'a>(document: &'a Html, selector: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(selector).ok()?;
    document.select(&selector).next()
}

/// Select matching elements that are not inside a non-content subtree
fn select_content<'a>(document: &'a Html, selector: &str) -> Vec<ElementRef<'a>> {
    let Ok(selector) = Selector::parse(selector) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter(|element| !in_non_content_subtree(element))
        .collect()
}

fn in_non_content_subtree(element: &ElementRef<'_>) -> bool {
    element.ancestors().any(|ancestor| match ancestor.value() {
        Node::Element(el) => NON_CONTENT_TAGS.contains(&el.name()),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html>
          <head>
            <title>  Acme   Widgets </title>
            <meta name="description" content="  Widgets for every need.  ">
            <style>body { color: red; }</style>
            <script>console.log("tracking");</script>
          </head>
          <body>
            <header><p>Logo and tagline</p></header>
            <nav><a href="/home">Home</a></nav>
            <h1>Welcome   to Acme</h1>
            <p>We make widgets.
               The finest    widgets.</p>
            <p>   </p>
            <p>Since 1999.</p>
            <a href="/contact">Contact   us</a>
            <img src="/logo.png" alt="Acme logo">
            <aside><p>Sidebar noise</p></aside>
            <footer><p>Copyright Acme</p></footer>
          </body>
        </html>
    "#;

    #[test]
    fn test_extract_text_has_no_whitespace_runs() {
        let text = extract_text(PAGE);

        assert!(!text.is_empty());
        assert!(
            !text.chars().collect::<Vec<_>>().windows(2).any(|pair| {
                pair[0].is_whitespace() && pair[1].is_whitespace()
            }),
            "normalized text must not contain whitespace runs: {:?}",
            text
        );
        assert_eq!(text, text.trim());
    }

    #[test]
    fn test_extract_text_drops_non_content_elements() {
        let text = extract_text(PAGE);

        assert!(text.contains("We make widgets."));
        assert!(text.contains("Welcome to Acme"));
        assert!(!text.contains("tracking"));
        assert!(!text.contains("color: red"));
        assert!(!text.contains("Logo and tagline"));
        assert!(!text.contains("Home"));
        assert!(!text.contains("Sidebar noise"));
        assert!(!text.contains("Copyright Acme"));
    }

    #[test]
    fn test_extract_structured_fields() {
        let page = extract_structured(PAGE);

        assert_eq!(page.title, "Acme Widgets");
        assert_eq!(page.meta_description, "Widgets for every need.");

        assert_eq!(page.headings.len(), 1);
        assert_eq!(page.headings[0].level, "h1");
        assert_eq!(page.headings[0].text, "Welcome to Acme");

        assert_eq!(
            page.paragraphs,
            vec![
                "We make widgets. The finest widgets.".to_string(),
                "Since 1999.".to_string(),
            ]
        );

        assert_eq!(page.links.len(), 1);
        assert_eq!(page.links[0].href, "/contact");
        assert_eq!(page.links[0].text, "Contact us");

        assert_eq!(page.images.len(), 1);
        assert_eq!(page.images[0].alt, "Acme logo");
        assert_eq!(page.images[0].src, "/logo.png");
    }

    #[test]
    fn test_structured_headings_keep_document_order() {
        let html = r#"
            <h2>Second level first</h2>
            <h1>Top level after</h1>
            <h3>Then a third</h3>
        "#;

        let page = extract_structured(html);

        let levels: Vec<_> = page.headings.iter().map(|h| h.level.as_str()).collect();
        assert_eq!(levels, vec!["h2", "h1", "h3"]);
    }

    #[tokio::test]
    async fn test_scrape_reports_fetch_failure() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let scraper = PageScraper::new(&CrawlerConfig::default()).unwrap();
        let result = scraper
            .scrape(&format!("{}/missing", server.url()), ScrapeMode::Text)
            .await;

        assert!(!result.success);
        assert!(result.text.is_none());
        assert!(result.error.is_some());

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_scrape_batch_visits_every_url_in_order() {
        let mut server = mockito::Server::new_async().await;
        let first = server
            .mock("GET", "/one")
            .with_status(200)
            .with_body("<p>page one</p>")
            .create_async()
            .await;
        let second = server
            .mock("GET", "/two")
            .with_status(200)
            .with_body("<p>page two</p>")
            .create_async()
            .await;

        let config = CrawlerConfig::builder().politeness_delay_ms(0).build();
        let scraper = PageScraper::new(&config).unwrap();

        let urls = vec![
            format!("{}/one", server.url()),
            format!("{}/two", server.url()),
        ];
        let results = scraper.scrape_batch(&urls, ScrapeMode::Text).await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].text.as_deref(), Some("page one"));
        assert_eq!(results[1].text.as_deref(), Some("page two"));

        first.assert_async().await;
        second.assert_async().await;
    }
}
