//! Collection naming for the ingestion module
//!
//! Collection identifiers must be short, stable and index-safe, so the
//! pattern is deliberately narrow rather than a general domain parser:
//! `http(s)://www.<name>.com` yields `<name>`, anything else the fixed
//! fallback.

use std::sync::OnceLock;

use regex::Regex;

/// Collection name used when the URL does not match the expected pattern
pub const FALLBACK_COLLECTION: &str = "website";

/// Derive the storage collection identifier for a site URL
///
/// Deterministic: the same URL always yields the same name.
pub fn collection_name(website_url: &str) -> String {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        Regex::new(r"https?://www\.([a-zA-Z0-9-]+)\.com").expect("collection pattern is valid")
    });

    match pattern.captures(website_url) {
        Some(captures) => captures[1].to_ascii_lowercase(),
        None => FALLBACK_COLLECTION.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_name_from_www_com_urls() {
        assert_eq!(collection_name("https://www.acme.com"), "acme");
        assert_eq!(collection_name("https://www.acme.com/pricing"), "acme");
        assert_eq!(collection_name("http://www.big-corp.com/about"), "big-corp");
    }

    #[test]
    fn test_name_is_lowercased() {
        assert_eq!(collection_name("https://www.AcMe.com"), "acme");
    }

    #[test]
    fn test_non_matching_urls_use_fallback() {
        assert_eq!(collection_name("https://blog.acme.io"), FALLBACK_COLLECTION);
        assert_eq!(collection_name("https://acme.com"), FALLBACK_COLLECTION);
        assert_eq!(collection_name("https://www.acme.dev"), FALLBACK_COLLECTION);
        assert_eq!(collection_name("not a url"), FALLBACK_COLLECTION);
        assert_eq!(collection_name(""), FALLBACK_COLLECTION);
    }

    #[test]
    fn test_idempotent() {
        let url = "https://www.acme.com/pricing";

        assert_eq!(collection_name(url), collection_name(url));
    }
}
