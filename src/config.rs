//! Retry policy and page-size configuration

use std::time::Duration;

/// Photos requested per page.
/// 100 keeps page counts low for typical accounts while staying well under
/// the service maximum.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Maximum photos per page accepted by the stats endpoint.
pub const MAX_PAGE_SIZE: u32 = 500;

/// Default total attempt count for one API call (initial attempt included).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default delay before the first retry.
pub const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_secs(2);

/// Cap on the exponential backoff delay.
pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Backoff schedule for one API call's retry loop.
///
/// The delay after the n-th failed attempt (1-based) is
/// `min(initial_backoff * 2^(n-1), max_backoff)`. No delay follows the
/// final attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per call, including the first
    pub max_attempts: u32,
    /// Delay before the first retry
    pub initial_backoff: Duration,
    /// Cap on the backoff delay
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_backoff: DEFAULT_INITIAL_BACKOFF,
            max_backoff: DEFAULT_MAX_BACKOFF,
        }
    }
}

impl RetryPolicy {
    /// Create a policy from explicit values.
    pub fn new(max_attempts: u32, initial_backoff: Duration, max_backoff: Duration) -> Self {
        Self {
            max_attempts,
            initial_backoff,
            max_backoff,
        }
    }

    /// Delay to wait after the `failed_attempt`-th failure (1-based).
    pub fn backoff_delay(&self, failed_attempt: u32) -> Duration {
        let exp = failed_attempt.saturating_sub(1).min(63);
        let delay = self
            .initial_backoff
            .saturating_mul(2u32.saturating_pow(exp));
        delay.min(self.max_backoff)
    }
}
