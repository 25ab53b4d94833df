//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with rate limiting and retry logic
//! - HTML parsing, boilerplate stripping and link extraction
//! - Text cleanup and signal derivation
//! - Frontier management and overall crawl coordination

mod builder;
mod coordinator;
mod fetcher;
mod frontier;
mod lifecycle;
mod parser;
mod processor;
mod rate_limiter;

pub use builder::CrawlerBuilder;
pub use coordinator::Crawler;
pub use fetcher::{backoff_delay, build_http_client, FetchResult, FetchedPage, Fetcher, HttpFetcher};
pub use frontier::{BreadthFirstFrontier, DepthFirstFrontier, Frontier};
pub use lifecycle::{ReleaseStack, Resource};
pub use parser::{HtmlPageParser, PageParser};
pub use processor::{classify_content, clean_text, detect_language, BasicTextProcessor, TextProcessor};
pub use rate_limiter::RateLimiter;
