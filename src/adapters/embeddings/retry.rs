//! Retry logic with exponential backoff for embedding requests.

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

use super::error::EmbeddingRequestError;

/// Retry policy with exponential backoff for embedding requests
///
/// Backoff doubles with each retry and is capped at `max_backoff_ms`.
///
/// # Retry Decision
/// - Retry on: 429, 5xx, network errors
/// - Do NOT retry: other 4xx, malformed responses
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_retries: u32,
    initial_backoff_ms: u64,
    max_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 500,
            max_backoff_ms: 8_000,
        }
    }
}

impl RetryPolicy {
    /// Create a new retry policy
    ///
    /// `max_retries == 0` disables retrying.
    pub const fn new(max_retries: u32, initial_backoff_ms: u64, max_backoff_ms: u64) -> Self {
        Self {
            max_retries,
            initial_backoff_ms,
            max_backoff_ms,
        }
    }

    /// Execute an operation with exponential backoff retry logic
    ///
    /// # Returns
    /// * `Ok(T)` - Operation succeeded
    /// * `Err(EmbeddingRequestError)` - Permanent error, or retries exhausted
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> Result<T, EmbeddingRequestError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, EmbeddingRequestError>>,
    {
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(result) => {
                    if attempt > 0 {
                        debug!(retries = attempt, "embedding request succeeded after retry");
                    }
                    return Ok(result);
                }
                Err(err) => {
                    if !self.should_retry(&err, attempt) {
                        if err.is_transient() {
                            warn!(attempts = attempt + 1, error = %err, "embedding request failed, retries exhausted");
                        } else {
                            debug!(error = %err, "permanent embedding error, not retrying");
                        }
                        return Err(err);
                    }

                    let backoff = self.calculate_backoff(attempt);
                    warn!(
                        attempt = attempt + 1,
                        backoff_ms = u64::try_from(backoff.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "transient embedding error, retrying"
                    );

                    sleep(backoff).await;
                    attempt += 1;
                }
            }
        }
    }

    /// min(initial_backoff * 2^attempt, max_backoff)
    fn calculate_backoff(&self, attempt: u32) -> Duration {
        let backoff_ms = self
            .initial_backoff_ms
            .saturating_mul(2_u64.saturating_pow(attempt))
            .min(self.max_backoff_ms);

        Duration::from_millis(backoff_ms)
    }

    const fn should_retry(&self, error: &EmbeddingRequestError, attempt: u32) -> bool {
        attempt < self.max_retries && error.is_transient()
    }
}
