//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Acquiring and releasing the fetcher and writer around each crawl
//! - Managing the frontier, the seen-set and per-URL depths
//! - Enforcing the page and depth budgets
//! - Coordinating fetching, extraction, signal derivation and writing
//! - Feeding discovered links back into the frontier

use crate::crawler::fetcher::{FetchResult, Fetcher};
use crate::crawler::frontier::Frontier;
use crate::crawler::lifecycle::{ReleaseStack, Resource};
use crate::crawler::parser::PageParser;
use crate::crawler::processor::TextProcessor;
use crate::output::{CrawlStats, RecordWriter};
use crate::page::PageRecord;
use crate::url::{resolve_and_filter, DomainRoot, LinkPolicy};
use crate::TrawlError;
use std::collections::{HashMap, HashSet};
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Single-domain crawler
///
/// Built with [`CrawlerBuilder`](crate::crawler::CrawlerBuilder). Owns every
/// component it drives; the seen-set, depth map and counters live only for
/// the duration of one [`crawl`](Crawler::crawl) call.
pub struct Crawler {
    pub(super) domain_root: DomainRoot,
    pub(super) start_url: Url,
    pub(super) frontier: Box<dyn Frontier>,
    pub(super) fetcher: Box<dyn Fetcher>,
    pub(super) parser: Box<dyn PageParser>,
    pub(super) processor: Box<dyn TextProcessor>,
    pub(super) writer: Box<dyn RecordWriter>,
    pub(super) link_policy: LinkPolicy,
    pub(super) max_pages: Option<u64>,
    pub(super) max_depth: Option<u32>,
    pub(super) cancel: CancellationToken,
}

/// Bookkeeping for one crawl invocation
#[derive(Default)]
struct CrawlState {
    seen: HashSet<String>,
    depths: HashMap<String, u32>,
    stats: CrawlStats,
}

impl Crawler {
    pub fn domain_root(&self) -> &DomainRoot {
        &self.domain_root
    }

    pub fn start_url(&self) -> &Url {
        &self.start_url
    }

    pub fn max_pages(&self) -> Option<u64> {
        self.max_pages
    }

    pub fn max_depth(&self) -> Option<u32> {
        self.max_depth
    }

    /// Token that stops the crawl at its next budget check when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Runs a complete crawl
    ///
    /// This method:
    /// 1. Opens the fetcher and the writer
    /// 2. Seeds the frontier with the start URL at depth 0
    /// 3. Pops, fetches, extracts and writes pages until the frontier is
    ///    empty, the page budget is reached or the crawl is cancelled
    /// 4. Releases every opened resource in reverse order, whatever happened
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlStats)` - Crawl ran to completion
    /// * `Err(TrawlError)` - A resource could not be acquired, written to or released
    pub async fn crawl(&mut self) -> Result<CrawlStats, TrawlError> {
        let mut releases = ReleaseStack::new();

        let outcome = match self.acquire(&mut releases).await {
            Ok(()) => self.run().await,
            Err(e) => Err(e),
        };
        let released = self.release(&mut releases).await;

        let stats = outcome?;
        released?;
        stats.log_summary();
        Ok(stats)
    }

    async fn acquire(&mut self, releases: &mut ReleaseStack) -> Result<(), TrawlError> {
        self.fetcher.open().await?;
        releases.register(Resource::HttpClient);

        self.writer.open().await?;
        releases.register(Resource::OutputSink);

        Ok(())
    }

    /// Releases everything in `releases`; returns the first failure, if any
    async fn release(&mut self, releases: &mut ReleaseStack) -> Result<(), TrawlError> {
        let mut first_error = None;

        while let Some(resource) = releases.next_release() {
            match resource {
                Resource::OutputSink => {
                    if let Err(e) = self.writer.close().await {
                        tracing::error!("Failed to close output: {}", e);
                        first_error.get_or_insert(TrawlError::from(e));
                    }
                }
                Resource::HttpClient => self.fetcher.close().await,
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn exceeds_depth(&self, depth: u32) -> bool {
        self.max_depth.map_or(false, |max| depth > max)
    }

    fn page_budget_reached(&self, pages_written: u64) -> bool {
        self.max_pages.map_or(false, |max| pages_written >= max)
    }

    /// Runs the main crawl loop
    async fn run(&mut self) -> Result<CrawlStats, TrawlError> {
        let started = Instant::now();
        let mut state = CrawlState::default();

        // Leftovers from an earlier, interrupted invocation
        while self.frontier.pop().is_some() {}

        let seed = self.start_url.to_string();
        state.seen.insert(seed.clone());
        state.depths.insert(seed.clone(), 0);
        self.frontier.push(seed);
        state.stats.urls_enqueued = 1;

        tracing::info!(
            "Starting crawl of {} within {} (max depth: {:?}, max pages: {:?})",
            self.start_url,
            self.domain_root,
            self.max_depth,
            self.max_pages
        );

        loop {
            if self.cancel.is_cancelled() {
                tracing::info!("Crawl cancelled");
                state.stats.cancelled = true;
                break;
            }

            if self.page_budget_reached(state.stats.pages_written) {
                tracing::info!("Page limit reached after {} pages", state.stats.pages_written);
                break;
            }

            let Some(current_url) = self.frontier.pop() else {
                tracing::info!("Frontier is empty, crawl complete");
                break;
            };

            let current_depth = state.depths.get(&current_url).copied().unwrap_or(0);
            if self.exceeds_depth(current_depth) {
                tracing::debug!("Skipping {} at depth {}", current_url, current_depth);
                state.stats.depth_skips += 1;
                continue;
            }

            self.process_url(&current_url, current_depth, &mut state)
                .await?;

            if state.stats.pages_fetched % 10 == 0 {
                tracing::info!(
                    "Progress: {} pages fetched, {} written, {} in frontier",
                    state.stats.pages_fetched,
                    state.stats.pages_written,
                    self.frontier.len()
                );
            }
        }

        state.stats.frontier_remaining = self.frontier.len();
        state.stats.elapsed = started.elapsed();
        Ok(state.stats)
    }

    /// Processes a single URL
    ///
    /// Per-page failures (fetch failures, pages without content) are absorbed
    /// here; only writer errors propagate.
    async fn process_url(
        &mut self,
        current_url: &str,
        current_depth: u32,
        state: &mut CrawlState,
    ) -> Result<(), TrawlError> {
        tracing::debug!("Fetching {} (depth {})", current_url, current_depth);
        state.stats.pages_fetched += 1;

        let response = match self.fetcher.get(current_url).await? {
            FetchResult::Success(response) => response,
            FetchResult::NotFound => {
                state.stats.fetch_failures += 1;
                return Ok(());
            }
            FetchResult::Unavailable { reason, attempts } => {
                tracing::debug!(
                    "Skipping {} after {} attempts: {}",
                    current_url,
                    attempts,
                    reason
                );
                state.stats.fetch_failures += 1;
                return Ok(());
            }
        };

        let (page, links) = self.parser.process_page(current_url, &response);

        match page {
            Some(page) => {
                let (page, signals) = self.processor.derive_signals(page);
                self.writer.write(PageRecord::new(page, signals)).await?;
                state.stats.pages_written += 1;
                tracing::debug!("Wrote record for {}", current_url);
            }
            None => state.stats.extraction_misses += 1,
        }

        // Expansion happens only strictly below the depth limit
        if self.max_depth.map_or(false, |max| current_depth >= max) {
            return Ok(());
        }

        self.enqueue_links(current_url, current_depth, &links, state);
        Ok(())
    }

    /// Handles discovered links from a page
    ///
    /// This method:
    /// 1. Resolves and filters each raw href against the domain root and policy
    /// 2. Drops URLs already in the seen-set
    /// 3. Drops URLs whose depth would exceed the limit
    /// 4. Records the depth and pushes the rest to the frontier
    fn enqueue_links(
        &mut self,
        current_url: &str,
        current_depth: u32,
        links: &[String],
        state: &mut CrawlState,
    ) {
        let base = match Url::parse(current_url) {
            Ok(base) => base,
            Err(e) => {
                tracing::warn!("Cannot resolve links against {}: {}", current_url, e);
                return;
            }
        };

        let next_depth = current_depth + 1;
        if self.exceeds_depth(next_depth) {
            return;
        }

        for href in links {
            let Some(normalized) =
                resolve_and_filter(href, &base, &self.domain_root, &self.link_policy)
            else {
                tracing::trace!("Rejected link {:?} on {}", href, current_url);
                continue;
            };

            let normalized = String::from(normalized);
            if state.seen.contains(&normalized) {
                continue;
            }

            state.seen.insert(normalized.clone());
            state.depths.insert(normalized.clone(), next_depth);
            self.frontier.push(normalized);
            state.stats.urls_enqueued += 1;
        }
    }
}
