//! # Crawler Configuration Module
//!
//! This module provides configuration options for the site crawler, including
//! network policy (timeout, user agent, politeness delay) and link filtering.
//! It uses a builder pattern for flexible configuration.
//!
//! ## Key Components
//!
//! - `CrawlerConfig`: network policy shared by the link extractor and page scraper
//! - `CrawlerConfigBuilder`: builder pattern implementation for easier configuration
//! - `LinkFilters`: filter chain applied to extracted links
//!
//! ## Features
//!
//! - Defaults suitable for polite crawling of a single site
//! - Include/exclude regex patterns (case-insensitive)
//! - Extension exclusions with a default binary/media list

use regex::{Regex, RegexBuilder};
use std::time::Duration;

/// Configuration for the crawler
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Delay in milliseconds between sequential page fetches
    pub politeness_delay_ms: u64,

    /// User agent to use for requests
    pub user_agent: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            politeness_delay_ms: 1000,
            user_agent: format!("ragweed-crawler/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl CrawlerConfig {
    /// Create a new builder
    pub fn builder() -> CrawlerConfigBuilder {
        CrawlerConfigBuilder::new()
    }

    /// Get the request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get the politeness delay as a Duration
    pub fn politeness_delay(&self) -> Duration {
        Duration::from_millis(self.politeness_delay_ms)
    }
}

/// Builder for CrawlerConfig
#[derive(Debug, Default)]
pub struct CrawlerConfigBuilder {
    config: CrawlerConfig,
}

impl CrawlerConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: CrawlerConfig::default(),
        }
    }

    /// Set the per-request timeout in seconds
    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.config.timeout_secs = timeout_secs;
        self
    }

    /// Set the delay between sequential page fetches in milliseconds
    pub fn politeness_delay_ms(mut self, politeness_delay_ms: u64) -> Self {
        self.config.politeness_delay_ms = politeness_delay_ms;
        self
    }

    /// Set the user agent to use for requests
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Build the configuration
    pub fn build(self) -> CrawlerConfig {
        self.config
    }
}

/// Which side of the internal/external partition to keep before further filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkSelection {
    /// Keep every link
    #[default]
    All,

    /// Keep only links on the same network location as the source page
    InternalOnly,

    /// Keep only links on a different network location
    ExternalOnly,
}

/// Filter chain applied to extracted links, in declaration order:
/// selection, include pattern, exclude pattern, explicit extensions,
/// default binary/media extensions.
#[derive(Debug, Clone)]
pub struct LinkFilters {
    /// Internal/external selection
    pub selection: LinkSelection,

    /// Keep only links whose absolute URL matches this pattern
    pub include_pattern: Option<Regex>,

    /// Drop links whose absolute URL matches this pattern
    pub exclude_pattern: Option<Regex>,

    /// Extensions to drop, without the leading dot
    pub exclude_extensions: Vec<String>,

    /// Whether to drop links ending in a common binary/media extension
    pub exclude_common_files: bool,
}

impl Default for LinkFilters {
    fn default() -> Self {
        Self {
            selection: LinkSelection::All,
            include_pattern: None,
            exclude_pattern: None,
            exclude_extensions: Vec::new(),
            exclude_common_files: true,
        }
    }
}

impl LinkFilters {
    /// Set the internal/external selection
    pub fn with_selection(mut self, selection: LinkSelection) -> Self {
        self.selection = selection;
        self
    }

    /// Set the include pattern, compiled case-insensitively
    pub fn with_include_pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.include_pattern = Some(case_insensitive(pattern)?);
        Ok(self)
    }

    /// Set the exclude pattern, compiled case-insensitively
    pub fn with_exclude_pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.exclude_pattern = Some(case_insensitive(pattern)?);
        Ok(self)
    }

    /// Set explicit extensions to exclude (without the leading dot)
    pub fn with_excluded_extensions(mut self, extensions: Vec<String>) -> Self {
        self.exclude_extensions = extensions;
        self
    }

    /// Disable the default binary/media extension exclusion
    pub fn keep_common_files(mut self) -> Self {
        self.exclude_common_files = false;
        self
    }
}

fn case_insensitive(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}
