//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the crawler's user agent and accept headers
//! - Passing every attempt through the shared rate limiter
//! - Retry with exponential backoff and jitter for transient failures
//! - Error classification into success, not-found and unavailable

use crate::config::FetcherConfig;
use crate::crawler::rate_limiter::RateLimiter;
use crate::TrawlError;
use async_trait::async_trait;
use rand::Rng;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{redirect::Policy, Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Accept header sent with every request
const ACCEPT_HTML: &str = "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8";

/// Maximum redirect hops followed automatically
const MAX_REDIRECTS: usize = 10;

/// A successfully fetched response
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL that was requested
    pub url: String,
    /// Final URL after redirects
    pub final_url: String,
    /// HTTP status code
    pub status_code: u16,
    /// Content-Type header value, if any
    pub content_type: Option<String>,
    /// Response body
    pub body: String,
    /// Number of attempts it took, the successful one included
    pub attempts: u32,
}

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// The resource was retrieved
    Success(FetchedPage),

    /// HTTP 404; never retried
    NotFound,

    /// Terminal failure: any other non-2xx status, retries exhausted, or cancelled
    Unavailable {
        /// Description of the last failure
        reason: String,
        /// Attempts made before giving up
        attempts: u32,
    },
}

impl FetchResult {
    /// Returns the fetched page, discarding failure details
    pub fn into_page(self) -> Option<FetchedPage> {
        match self {
            Self::Success(page) => Some(page),
            Self::NotFound | Self::Unavailable { .. } => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Retrieves resources for the crawler
///
/// `get` reports ordinary network and HTTP conditions through [`FetchResult`];
/// an `Err` is reserved for lifecycle misuse such as fetching after `close`.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Acquires network resources; called once at crawl start
    async fn open(&mut self) -> Result<(), TrawlError> {
        Ok(())
    }

    /// Fetches a URL
    async fn get(&self, url: &str) -> Result<FetchResult, TrawlError>;

    /// Releases network resources. Calling it twice is a no-op.
    async fn close(&mut self) {}
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```
/// use site_trawl::config::FetcherConfig;
/// use site_trawl::crawler::build_http_client;
///
/// let client = build_http_client(&FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));

    Client::builder()
        .user_agent(config.user_agent.clone())
        .default_headers(headers)
        .timeout(config.timeout())
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Delay before retry number `attempt + 1`: `base * 2^attempt` plus up to 10% jitter
pub fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    let delay = base.saturating_mul(2u32.saturating_pow(attempt));
    if delay.is_zero() {
        return delay;
    }
    let jitter: f64 = rand::thread_rng().gen_range(0.0..=0.1);
    delay.saturating_add(delay.mul_f64(jitter))
}

/// Outcome of a single HTTP attempt
enum Attempt {
    Done(FetchedPage),
    NotFound,
    Retriable(String),
    Terminal(String),
}

/// reqwest-backed fetcher with rate limiting and bounded retries
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | HTTP 404 | Immediate → NotFound |
/// | Other HTTP 4xx | Immediate → Unavailable |
/// | Other non-2xx (304, unfollowed 3xx, 1xx) | Immediate → Unavailable |
/// | HTTP 5xx | Retry up to `max_retries` times |
/// | Timeout / network error | Retry up to `max_retries` times |
pub struct HttpFetcher {
    config: FetcherConfig,
    rate_limiter: Arc<RateLimiter>,
    client: Option<Client>,
    cancel: CancellationToken,
}

impl HttpFetcher {
    /// Creates a fetcher with its own rate limiter; no connection is made until `open`
    pub fn new(config: FetcherConfig) -> Self {
        let rate_limiter = Arc::new(RateLimiter::new(config.min_request_interval()));
        Self {
            config,
            rate_limiter,
            client: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Shares an existing rate limiter instead of the fetcher's own
    pub fn with_rate_limiter(mut self, rate_limiter: Arc<RateLimiter>) -> Self {
        self.rate_limiter = rate_limiter;
        self
    }

    /// Makes rate-limit waits and backoff sleeps end early when `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn rate_limiter(&self) -> &Arc<RateLimiter> {
        &self.rate_limiter
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    /// Returns true while the client is held
    pub fn is_open(&self) -> bool {
        self.client.is_some()
    }

    async fn attempt(&self, client: &Client, url: &str) -> Attempt {
        let response = match client.get(url).send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                tracing::warn!("Timeout while fetching {}: {}", url, e);
                return Attempt::Retriable(format!("timeout: {}", e));
            }
            Err(e) => {
                tracing::warn!("Request error while fetching {}: {}", url, e);
                return Attempt::Retriable(format!("request error: {}", e));
            }
        };

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            tracing::info!("Not found (404) while fetching {}", url);
            return Attempt::NotFound;
        }
        if status.is_server_error() {
            tracing::warn!("HTTP {} while fetching {}", status.as_u16(), url);
            return Attempt::Retriable(format!("HTTP {}", status.as_u16()));
        }
        if status.is_client_error() {
            tracing::warn!("HTTP {} while fetching {}", status.as_u16(), url);
            return Attempt::Terminal(format!("HTTP {}", status.as_u16()));
        }
        if !status.is_success() {
            // Redirects that were not followed, 304s and informational responses
            tracing::warn!("Unexpected HTTP {} while fetching {}", status.as_u16(), url);
            return Attempt::Terminal(format!("HTTP {}", status.as_u16()));
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        match response.text().await {
            Ok(body) => Attempt::Done(FetchedPage {
                url: url.to_string(),
                final_url,
                status_code: status.as_u16(),
                content_type,
                body,
                attempts: 0,
            }),
            Err(e) => {
                tracing::warn!("Failed to read body of {}: {}", url, e);
                Attempt::Retriable(format!("body error: {}", e))
            }
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn open(&mut self) -> Result<(), TrawlError> {
        if self.client.is_none() {
            self.client = Some(build_http_client(&self.config)?);
            tracing::debug!("HTTP client opened");
        }
        Ok(())
    }

    async fn get(&self, url: &str) -> Result<FetchResult, TrawlError> {
        let client = self.client.as_ref().ok_or(TrawlError::FetcherClosed)?;
        let mut attempt: u32 = 0;

        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    return Ok(FetchResult::Unavailable {
                        reason: "cancelled".to_string(),
                        attempts: attempt,
                    });
                }
                _ = self.rate_limiter.wait() => {}
            }

            let reason = match self.attempt(client, url).await {
                Attempt::Done(mut page) => {
                    page.attempts = attempt + 1;
                    return Ok(FetchResult::Success(page));
                }
                Attempt::NotFound => return Ok(FetchResult::NotFound),
                Attempt::Terminal(reason) => {
                    tracing::error!("Giving up on {} after {} attempts", url, attempt + 1);
                    return Ok(FetchResult::Unavailable {
                        reason,
                        attempts: attempt + 1,
                    });
                }
                Attempt::Retriable(reason) => reason,
            };

            if attempt >= self.config.max_retries {
                tracing::error!("Giving up on {} after {} attempts", url, attempt + 1);
                return Ok(FetchResult::Unavailable {
                    reason,
                    attempts: attempt + 1,
                });
            }

            let delay = backoff_delay(self.config.backoff_base(), attempt);
            tracing::debug!(
                "Retrying {} in {:.2}s (attempt {})",
                url,
                delay.as_secs_f64(),
                attempt + 1
            );

            tokio::select! {
                _ = self.cancel.cancelled() => {
                    return Ok(FetchResult::Unavailable {
                        reason: "cancelled".to_string(),
                        attempts: attempt + 1,
                    });
                }
                _ = tokio::time::sleep(delay) => {}
            }

            attempt += 1;
        }
    }

    async fn close(&mut self) {
        if self.client.take().is_some() {
            tracing::debug!("HTTP client closed");
        }
    }
}
