//! Minimum-interval rate limiter
//!
//! Serializes request timing across every caller sharing the limiter. This is
//! a mutex around the time of the last permit, not a token bucket: there is no
//! burst allowance beyond the very first call.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Enforces a minimum wall-clock interval between permitted actions
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_permit: Mutex<Option<Instant>>,
    permits_granted: AtomicU64,
}

impl RateLimiter {
    /// Creates a limiter; a zero interval never waits
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_permit: Mutex::new(None),
            permits_granted: AtomicU64::new(0),
        }
    }

    /// Returns the configured interval
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Returns how many times `wait` has let a caller through
    pub fn permits_granted(&self) -> u64 {
        self.permits_granted.load(Ordering::SeqCst)
    }

    /// Waits until at least `min_interval` has passed since the last permit
    ///
    /// The first call returns immediately. The lock is held across the sleep
    /// so that concurrent callers queue up behind each other instead of
    /// proceeding within the same interval.
    pub async fn wait(&self) {
        let mut last = self.last_permit.lock().await;

        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                let remaining = self.min_interval - elapsed;
                tracing::trace!("Rate limiter sleeping {:?}", remaining);
                tokio::time::sleep(remaining).await;
            }
        }

        *last = Some(Instant::now());
        self.permits_granted.fetch_add(1, Ordering::SeqCst);
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}
