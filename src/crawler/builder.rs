//! Crawler construction
//!
//! Every component of a [`Crawler`] can be swapped out; whatever is left
//! unset falls back to the HTTP/HTML/JSONL defaults driven by [`Config`].

use crate::config::Config;
use crate::crawler::coordinator::Crawler;
use crate::crawler::fetcher::{Fetcher, HttpFetcher};
use crate::crawler::frontier::{BreadthFirstFrontier, Frontier};
use crate::crawler::parser::{HtmlPageParser, PageParser};
use crate::crawler::processor::{BasicTextProcessor, TextProcessor};
use crate::output::{JsonlWriter, RecordWriter};
use crate::url::{domain_root, normalize_url, LinkPolicy};
use crate::TrawlError;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

/// Builder for [`Crawler`]
///
/// # Example
///
/// ```no_run
/// use site_trawl::CrawlerBuilder;
///
/// # async fn run() -> site_trawl::Result<()> {
/// let mut crawler = CrawlerBuilder::new("https://example.com", "https://example.com/docs", "out.jsonl")
///     .with_max_depth(2)
///     .with_max_pages(100)
///     .build()?;
/// let stats = crawler.crawl().await?;
/// println!("{} pages written", stats.pages_written);
/// # Ok(())
/// # }
/// ```
pub struct CrawlerBuilder {
    domain_url: String,
    start_url: String,
    output_path: PathBuf,
    config: Config,
    max_depth: Option<u32>,
    max_pages: Option<u64>,
    link_policy: Option<LinkPolicy>,
    frontier: Option<Box<dyn Frontier>>,
    fetcher: Option<Box<dyn Fetcher>>,
    parser: Option<Box<dyn PageParser>>,
    processor: Option<Box<dyn TextProcessor>>,
    writer: Option<Box<dyn RecordWriter>>,
    cancel: CancellationToken,
}

impl CrawlerBuilder {
    pub fn new(
        domain_url: impl Into<String>,
        start_url: impl Into<String>,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            domain_url: domain_url.into(),
            start_url: start_url.into(),
            output_path: output_path.into(),
            config: Config::default(),
            max_depth: None,
            max_pages: None,
            link_policy: None,
            frontier: None,
            fetcher: None,
            parser: None,
            processor: None,
            writer: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Applies a loaded configuration
    ///
    /// Takes the budgets and link policy from `[crawler]` and keeps the rest
    /// for the default fetcher and parser. Later `with_*` calls override it.
    pub fn with_config(mut self, config: &Config) -> Self {
        self.max_depth = config.crawler.max_depth;
        self.max_pages = config.crawler.max_pages;
        self.link_policy = Some(LinkPolicy::new(&config.crawler.denied_path_keywords));
        self.config = config.clone();
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    pub fn with_max_pages(mut self, max_pages: u64) -> Self {
        self.max_pages = Some(max_pages);
        self
    }

    pub fn with_link_policy(mut self, policy: LinkPolicy) -> Self {
        self.link_policy = Some(policy);
        self
    }

    pub fn with_frontier(mut self, frontier: Box<dyn Frontier>) -> Self {
        self.frontier = Some(frontier);
        self
    }

    pub fn with_fetcher(mut self, fetcher: Box<dyn Fetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn with_parser(mut self, parser: Box<dyn PageParser>) -> Self {
        self.parser = Some(parser);
        self
    }

    pub fn with_processor(mut self, processor: Box<dyn TextProcessor>) -> Self {
        self.processor = Some(processor);
        self
    }

    pub fn with_writer(mut self, writer: Box<dyn RecordWriter>) -> Self {
        self.writer = Some(writer);
        self
    }

    /// Uses `token` to stop the crawl and any pending retry backoff
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Validates the URLs and assembles the crawler
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to crawl
    /// * `Err(TrawlError::Url)` - Either URL is malformed
    /// * `Err(TrawlError::DomainMismatch)` - The seed is outside the domain root
    pub fn build(self) -> Result<Crawler, TrawlError> {
        let root = domain_root(&self.domain_url)?;
        let start_url = normalize_url(&self.start_url)?;

        if !root.contains(&start_url) {
            return Err(TrawlError::DomainMismatch {
                seed: start_url.to_string(),
                domain_root: root.to_string(),
            });
        }

        let cancel = self.cancel;
        let config = self.config;

        let fetcher: Box<dyn Fetcher> = match self.fetcher {
            Some(fetcher) => fetcher,
            None => Box::new(
                HttpFetcher::new(config.fetcher.clone()).with_cancellation(cancel.clone()),
            ),
        };

        Ok(Crawler {
            domain_root: root,
            start_url,
            frontier: self
                .frontier
                .unwrap_or_else(|| Box::new(BreadthFirstFrontier::new())),
            fetcher,
            parser: self
                .parser
                .unwrap_or_else(|| Box::new(HtmlPageParser::from_config(&config.parser))),
            processor: self
                .processor
                .unwrap_or_else(|| Box::new(BasicTextProcessor::new())),
            writer: self
                .writer
                .unwrap_or_else(|| Box::new(JsonlWriter::new(&self.output_path))),
            link_policy: self.link_policy.unwrap_or_default(),
            max_pages: self.max_pages,
            max_depth: self.max_depth,
            cancel,
        })
    }
}
