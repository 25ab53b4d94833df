//! Site-Trawl: a single-domain content crawler
//!
//! This crate walks one website breadth-first from a seed URL, extracts the
//! text and outbound links of every page, derives lightweight text signals and
//! appends one JSON record per page to an output file.

pub mod config;
pub mod crawler;
pub mod output;
pub mod page;
pub mod url;

use thiserror::Error;

/// Main error type for Site-Trawl operations
///
/// Only setup and resource-lifecycle problems end up here. Failures that
/// concern a single page are absorbed inside the crawl loop.
#[derive(Debug, Error)]
pub enum TrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Seed URL {seed} is outside of domain {domain_root}")]
    DomainMismatch { seed: String, domain_root: String },

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Fetcher used before open or after close")]
    FetcherClosed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("URL has no scheme: {0}")]
    MissingScheme(String),

    #[error("URL has no host: {0}")]
    MissingDomain(String),
}

/// Result type alias for Site-Trawl operations
pub type Result<T> = std::result::Result<T, TrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Crawler, CrawlerBuilder};
pub use page::{ContentType, Page, PageRecord, Signals};
pub use crate::url::{domain_root, normalize_url, resolve_and_filter, DomainRoot, LinkPolicy};
