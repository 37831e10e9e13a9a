//! Resilient-call primitive: retry with exponential backoff
//!
//! Wraps one remote operation in a retry loop. Retryable failures (rate
//! limits, transport errors, 5xx) sleep the policy's backoff delay and try
//! again; non-retryable failures return immediately. The backoff sequence
//! is fully deterministic: `delay_n = min(initial * 2^(n-1), max)`.

use std::future::Future;
use tracing::{debug, error, warn};

use crate::config::RetryPolicy;
use crate::fetcher::{FetcherError, FetcherResult};

/// Execute `attempt_fn` up to `policy.max_attempts` times.
///
/// `operation` labels log output only. Each retry emits a warning with the
/// attempt number and computed delay; exhaustion emits an error and returns
/// the last failure. No delay follows the final attempt, and the first
/// successful attempt produces no log side effect.
pub async fn call_with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    operation: &str,
    mut attempt_fn: F,
) -> FetcherResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = FetcherResult<T>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut last_error = None;

    for attempt in 1..=max_attempts {
        match attempt_fn().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(operation, attempt, "call succeeded after retry");
                }
                return Ok(value);
            }
            Err(e) if !e.is_retryable() => {
                debug!(operation, attempt, error = %e, "non-retryable failure");
                return Err(e);
            }
            Err(e) => {
                if attempt < max_attempts {
                    let delay = policy.backoff_delay(attempt);
                    warn!(
                        operation,
                        attempt,
                        max_attempts,
                        delay_secs = delay.as_secs_f64(),
                        error = %e,
                        "transient failure, retrying after backoff"
                    );
                    tokio::time::sleep(delay).await;
                }
                last_error = Some(e);
            }
        }
    }

    let err = last_error
        .unwrap_or_else(|| FetcherError::NetworkError("all retries exhausted".to_string()));
    error!(operation, max_attempts, error = %err, "call failed after all attempts");
    Err(err)
}
