use crate::url::DEFAULT_DENIED_PATH_KEYWORDS;
use serde::Deserialize;
use std::time::Duration;

/// Boilerplate regions stripped from page text by default
pub const DEFAULT_BOILERPLATE_SELECTORS: &[&str] = &[
    "header",
    ".site-header",
    ".main-header",
    ".header-box",
    "#header",
    "footer",
    ".site-footer",
    ".main-footer",
    "#footer",
    ".tags-box",
];

/// Main configuration structure for Site-Trawl
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub parser: ParserConfig,
}

/// Crawl budget and link policy
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum depth from the seed (seed = 0); unlimited when absent
    #[serde(rename = "max-depth", default)]
    pub max_depth: Option<u32>,

    /// Maximum number of records to write; unlimited when absent
    #[serde(rename = "max-pages", default)]
    pub max_pages: Option<u64>,

    /// Links whose lowercased path contains one of these are never followed
    #[serde(
        rename = "denied-path-keywords",
        default = "default_denied_path_keywords"
    )]
    pub denied_path_keywords: Vec<String>,
}

/// HTTP fetch behavior
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    /// Per-request timeout (milliseconds)
    #[serde(rename = "timeout-ms", default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Retries after the first attempt for retriable failures
    #[serde(rename = "max-retries", default = "default_max_retries")]
    pub max_retries: u32,

    /// Base of the exponential backoff (milliseconds)
    #[serde(rename = "backoff-base-ms", default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,

    /// Minimum time between two requests (milliseconds)
    #[serde(rename = "min-request-interval-ms", default)]
    pub min_request_interval_ms: u64,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

/// Content extraction behavior
#[derive(Debug, Clone, Deserialize)]
pub struct ParserConfig {
    /// CSS selectors of boilerplate regions to drop from page text
    #[serde(
        rename = "boilerplate-selectors",
        default = "default_boilerplate_selectors"
    )]
    pub boilerplate_selectors: Vec<String>,

    /// Only strip the selectors that occur on the first crawled page
    #[serde(rename = "learn-from-first-page", default = "default_true")]
    pub learn_from_first_page: bool,
}

impl FetcherConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn backoff_base(&self) -> Duration {
        Duration::from_millis(self.backoff_base_ms)
    }

    pub fn min_request_interval(&self) -> Duration {
        Duration::from_millis(self.min_request_interval_ms)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            max_pages: None,
            denied_path_keywords: default_denied_path_keywords(),
        }
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            max_retries: default_max_retries(),
            backoff_base_ms: default_backoff_base_ms(),
            min_request_interval_ms: 0,
            user_agent: default_user_agent(),
        }
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            boilerplate_selectors: default_boilerplate_selectors(),
            learn_from_first_page: true,
        }
    }
}

fn default_denied_path_keywords() -> Vec<String> {
    DEFAULT_DENIED_PATH_KEYWORDS
        .iter()
        .map(|k| k.to_string())
        .collect()
}

fn default_boilerplate_selectors() -> Vec<String> {
    DEFAULT_BOILERPLATE_SELECTORS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_max_retries() -> u32 {
    2
}

fn default_backoff_base_ms() -> u64 {
    500
}

fn default_user_agent() -> String {
    format!("site-trawl/{}", env!("CARGO_PKG_VERSION"))
}

fn default_true() -> bool {
    true
}
