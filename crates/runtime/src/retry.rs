//! Bounded exponential backoff for remote store calls.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::store::StoreError;

/// Errors surfaced by [`RetryPolicy::execute`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RetryError {
    /// Every attempt failed transiently; the store is rate limiting us.
    #[error("rate limit exceeded after {attempts} attempts")]
    RateLimitExceeded { attempts: u32 },

    /// A fatal store failure; retrying was not attempted.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Retry policy with bounded exponential backoff.
///
/// Retries only transient failures, sleeping `base_delay * 2^(attempt - 1)`
/// before each retry (1s, 2s, 4s from the default base) and never after the
/// final failed attempt. Fatal failures abort immediately. The policy keeps
/// no state across calls: each `execute` is independent, so correctness
/// relies on callers not issuing unbounded concurrent calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, the initial call included.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles for each retry after.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Create a policy with explicit bounds. `max_attempts` is clamped to at
    /// least one.
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Run `operation` until it succeeds, fails fatally, or exhausts the
    /// attempt budget.
    ///
    /// `label` names the operation in logs.
    pub async fn execute<T, F, Fut>(&self, label: &str, mut operation: F) -> Result<T, RetryError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, StoreError>>,
    {
        let max_attempts = self.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            match operation().await {
                Ok(value) => {
                    if attempt > 1 {
                        info!("{} succeeded after {} attempt(s)", label, attempt);
                    }
                    return Ok(value);
                }
                Err(err) if err.is_transient() && attempt < max_attempts => {
                    let delay = self.base_delay * 2u32.pow(attempt - 1);
                    warn!(
                        "{} failed transiently (attempt {}/{}): {}. Retrying in {:?}...",
                        label, attempt, max_attempts, err, delay
                    );
                    sleep(delay).await;
                }
                Err(err) if err.is_transient() => {
                    error!(
                        "{} exhausted {} attempts, last failure: {}",
                        label, max_attempts, err
                    );
                    return Err(RetryError::RateLimitExceeded {
                        attempts: max_attempts,
                    });
                }
                Err(err) => {
                    error!("{} failed fatally, not retrying: {}", label, err);
                    return Err(RetryError::Store(err));
                }
            }
        }

        // max_attempts >= 1, so the loop always returns.
        Err(RetryError::RateLimitExceeded {
            attempts: max_attempts,
        })
    }
}
