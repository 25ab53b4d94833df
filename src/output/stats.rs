//! Crawl statistics
//!
//! Counters collected by the crawl loop and reported once it finishes.

use std::time::Duration;

/// Counters describing one `crawl()` invocation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrawlStats {
    /// URLs popped from the frontier and handed to the fetcher
    pub pages_fetched: u64,

    /// Records handed to the writer
    pub pages_written: u64,

    /// Fetches that ended without a response (404, other 4xx, retries exhausted)
    pub fetch_failures: u64,

    /// Pages fetched but without extractable content
    pub extraction_misses: u64,

    /// URLs popped but skipped because their depth exceeds the limit
    pub depth_skips: u64,

    /// URLs pushed to the frontier, the seed included
    pub urls_enqueued: u64,

    /// URLs still waiting in the frontier when the crawl stopped
    pub frontier_remaining: usize,

    /// Whether the crawl stopped because of a cancellation request
    pub cancelled: bool,

    /// Wall-clock duration of the crawl loop
    pub elapsed: Duration,
}

impl CrawlStats {
    /// Creates an empty set of counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Pages written per second of crawl time
    pub fn pages_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        self.pages_written as f64 / secs
    }

    /// Logs a one-line summary at info level
    pub fn log_summary(&self) {
        tracing::info!(
            "Crawl finished: {} fetched, {} written, {} fetch failures, {} without content, {} depth skips, {} enqueued, {} left in frontier, {:.2} pages/sec{}",
            self.pages_fetched,
            self.pages_written,
            self.fetch_failures,
            self.extraction_misses,
            self.depth_skips,
            self.urls_enqueued,
            self.frontier_remaining,
            self.pages_per_second(),
            if self.cancelled { " (cancelled)" } else { "" }
        );
    }
}
