//! Timeout and retry around page-source provider calls.
//!
//! Only [`ScraperError::Timeout`] and [`ScraperError::Transport`] are retried.
//! Everything else is returned on first sight.

use std::future::Future;
use std::ops::AsyncFnMut;
use std::time::Duration;

use crate::error::ScraperError;

const MAX_DELAY_MS: u64 = 60_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first failure.
    pub max_retries: u32,
    pub backoff_base_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_base_ms: 500,
        }
    }
}

pub(crate) fn is_retriable(err: &ScraperError) -> bool {
    matches!(
        err,
        ScraperError::Timeout { .. } | ScraperError::Transport { .. }
    )
}

/// Bounds `call` by `limit`, mapping expiry to [`ScraperError::Timeout`].
pub(crate) async fn with_timeout<T, Fut>(
    target: &str,
    limit: Duration,
    call: Fut,
) -> Result<T, ScraperError>
where
    Fut: Future<Output = Result<T, ScraperError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(ScraperError::Timeout {
            target: target.to_owned(),
            timeout_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
        }),
    }
}

/// Runs `operation`, retrying transient failures with exponential back-off.
///
/// With `backoff_base_ms = 500` the sleeps are 500 ms, 1 s, 2 s, ... each
/// scaled by a random factor in `[0.75, 1.25)` and capped at 60 s.
pub(crate) async fn retry_with_backoff<T, F>(
    policy: RetryPolicy,
    target: &str,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: AsyncFnMut() -> Result<T, ScraperError>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= policy.max_retries {
                    return Err(err);
                }
                attempt += 1;
                let computed = policy
                    .backoff_base_ms
                    .saturating_mul(1u64 << (attempt - 1).min(10));
                let capped = computed.min(MAX_DELAY_MS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                tracing::warn!(
                    target_page = target,
                    attempt,
                    max_retries = policy.max_retries,
                    delay_ms,
                    error = %err,
                    "page source failed; retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
