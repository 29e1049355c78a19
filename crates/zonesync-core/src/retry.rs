//! Rate-limited retry
//!
//! Registrar APIs enforce request quotas (per minute, hour and day) that are
//! often undocumented. [`RetryPolicy::run`] wraps a single remote call and
//! retries it with a fixed backoff while the adapter reports
//! [`Error::RateLimited`](crate::Error::RateLimited). Every other error is
//! returned on the first attempt.
//!
//! Worst-case stall is `(max_attempts - 1) * backoff`.

use crate::error::Result;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Default number of invocations before giving up on a rate-limited call
pub const DEFAULT_MAX_ATTEMPTS: usize = 23;

/// Default wait between rate-limited attempts
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(5);

/// Bounded fixed-backoff retry for rate-limited remote calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of invocations, including the first one
    pub max_attempts: usize,

    /// Wait between attempts
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff: DEFAULT_BACKOFF,
        }
    }
}

impl RetryPolicy {
    /// Create a policy
    pub fn new(max_attempts: usize, backoff: Duration) -> Self {
        Self {
            max_attempts,
            backoff,
        }
    }

    /// A policy that never retries
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Run `op`, retrying while it fails with [`Error::RateLimited`](crate::Error::RateLimited)
    ///
    /// # Returns
    ///
    /// - `Ok(T)`: The first successful result
    /// - `Err(Error)`: The first non-rate-limit error, or the last rate-limit
    ///   error once `max_attempts` invocations have been made
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            match op().await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!("Rate-limited call succeeded on attempt {}", attempt);
                    }
                    return Ok(value);
                }
                Err(e) if e.is_rate_limited() => {
                    if attempt >= max_attempts {
                        warn!(
                            "Rate limit still exceeded after {} attempts, giving up",
                            attempt
                        );
                        return Err(e);
                    }
                    warn!(
                        "Rate limit exceeded (attempt {}/{}). Waiting {:?} to retry.",
                        attempt, max_attempts, self.backoff
                    );
                    tokio::time::sleep(self.backoff).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl From<&crate::config::RetryConfig> for RetryPolicy {
    fn from(config: &crate::config::RetryConfig) -> Self {
        Self::new(config.max_attempts, Duration::from_secs(config.backoff_secs))
    }
}
