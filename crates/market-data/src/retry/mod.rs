//! Generic exponential-backoff retry executor.
//!
//! Wraps any async operation returning `Result<T, FetchError>`. The delay
//! before retry attempt k (k >= 1) is `base_delay * 2^(k-1)` plus uniform
//! random jitter. Errors classified [`RetryClass::Never`] short-circuit
//! immediately without consuming the remaining budget; rate limits retry
//! like any transient failure but are logged distinctly.

use std::future::Future;
use std::time::Duration;

use log::warn;
use rand::Rng;

use crate::errors::{FetchError, RetryClass};

/// Retry policy: attempt budget, base delay and jitter bound.
#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    /// Maximum number of times the operation is invoked (including the first).
    pub max_attempts: u32,
    /// Base delay; doubles after each failed attempt.
    pub base_delay: Duration,
    /// Upper bound of the uniform random jitter added to each delay.
    pub max_jitter: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration, max_jitter: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
            max_jitter,
        }
    }

    /// Full per-ticker policy: 3 attempts, 500ms base.
    pub fn standard() -> Self {
        Self::new(3, Duration::from_millis(500), Duration::from_millis(250))
    }

    /// Shorter policy for the bulk snapshot request, which has a cheap
    /// per-ticker fallback behind it.
    pub fn bulk() -> Self {
        Self::new(2, Duration::from_millis(250), Duration::from_millis(100))
    }

    /// Policy with no sleeps, for tests.
    pub fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO, Duration::ZERO)
    }

    /// Pre-jitter delay before the k-th retry (k >= 1).
    pub fn backoff_delay(&self, retry: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(retry.saturating_sub(1))
    }

    fn jitter(&self) -> Duration {
        let max_ms = self.max_jitter.as_millis() as u64;
        if max_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::thread_rng().gen_range(0..=max_ms))
    }
}

/// Run `op` under `policy`, returning the first success or the last error.
///
/// `label` identifies the operation in logs.
pub async fn retry<T, F, Fut>(
    policy: RetryPolicy,
    label: &str,
    mut op: F,
) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut last_error: Option<FetchError> = None;

    for attempt in 1..=max_attempts {
        if attempt > 1 {
            let delay = policy.backoff_delay(attempt - 1) + policy.jitter();
            tokio::time::sleep(delay).await;
        }

        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if err.retry_class() == RetryClass::Never {
                    return Err(err);
                }
                if err.is_rate_limit() {
                    warn!(
                        "{}: rate limited on attempt {}/{}",
                        label, attempt, max_attempts
                    );
                } else {
                    warn!(
                        "{}: attempt {}/{} failed: {}",
                        label, attempt, max_attempts, err
                    );
                }
                last_error = Some(err);
            }
        }
    }

    Err(last_error.unwrap_or(FetchError::Parse {
        message: format!("{}: retry loop exited without attempts", label),
    }))
}

/// Like [`retry`], but yields `fallback` (with a warning) instead of the
/// final error once the budget is exhausted.
pub async fn retry_or<T, F, Fut>(policy: RetryPolicy, label: &str, fallback: T, op: F) -> T
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    match retry(policy, label, op).await {
        Ok(value) => value,
        Err(err) => {
            warn!("{}: all attempts failed, using fallback: {}", label, err);
            fallback
        }
    }
}
