//! Unit tests for the retry/backoff primitive
//!
//! All tests run under paused tokio time, so backoff sleeps complete
//! instantly while still advancing the clock by the exact computed delays.

use flickr_stats_downloader::config::RetryPolicy;
use flickr_stats_downloader::fetcher::retry::call_with_retry;
use flickr_stats_downloader::fetcher::{FetcherError, FetcherResult};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

/// Shared attempt counter for injected operations
#[derive(Clone, Default)]
struct AttemptTracker {
    count: Arc<Mutex<u32>>,
}

impl AttemptTracker {
    fn record(&self) -> u32 {
        let mut count = self.count.lock().unwrap();
        *count += 1;
        *count
    }

    fn total(&self) -> u32 {
        *self.count.lock().unwrap()
    }
}

#[tokio::test(start_paused = true)]
async fn test_success_on_first_attempt_no_delay() {
    let policy = RetryPolicy::default();
    let tracker = AttemptTracker::default();
    let started = Instant::now();

    let t = tracker.clone();
    let result: FetcherResult<u32> = call_with_retry(&policy, "op", move || {
        let t = t.clone();
        async move { Ok(t.record()) }
    })
    .await;

    assert_eq!(result.unwrap(), 1);
    assert_eq!(tracker.total(), 1);
    assert_eq!(started.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_rate_limit_exhausts_with_exact_backoff_schedule() {
    // Defaults: 3 attempts, 2s initial, 60s cap -> delays of 2s then 4s,
    // no delay after the final attempt
    let policy = RetryPolicy::default();
    let tracker = AttemptTracker::default();
    let started = Instant::now();

    let t = tracker.clone();
    let result: FetcherResult<()> = call_with_retry(&policy, "op", move || {
        let t = t.clone();
        async move {
            t.record();
            Err(FetcherError::RateLimitExceeded)
        }
    })
    .await;

    assert!(matches!(result, Err(FetcherError::RateLimitExceeded)));
    assert_eq!(tracker.total(), 3);
    assert_eq!(started.elapsed(), Duration::from_secs(6));
}

#[tokio::test(start_paused = true)]
async fn test_rate_limit_then_success_retries_once() {
    let policy = RetryPolicy::default();
    let tracker = AttemptTracker::default();
    let started = Instant::now();

    let t = tracker.clone();
    let result: FetcherResult<&str> = call_with_retry(&policy, "op", move || {
        let t = t.clone();
        async move {
            if t.record() == 1 {
                Err(FetcherError::RateLimitExceeded)
            } else {
                Ok("recovered")
            }
        }
    })
    .await;

    assert_eq!(result.unwrap(), "recovered");
    assert_eq!(tracker.total(), 2);
    // Exactly one backoff delay at the initial value
    assert_eq!(started.elapsed(), Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn test_malformed_response_never_retried() {
    let policy = RetryPolicy::default();
    let tracker = AttemptTracker::default();
    let started = Instant::now();

    let t = tracker.clone();
    let result: FetcherResult<()> = call_with_retry(&policy, "op", move || {
        let t = t.clone();
        async move {
            t.record();
            Err(FetcherError::MalformedResponse("missing photos".to_string()))
        }
    })
    .await;

    assert!(matches!(result, Err(FetcherError::MalformedResponse(_))));
    assert_eq!(tracker.total(), 1);
    assert_eq!(started.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_api_error_never_retried() {
    let policy = RetryPolicy::default();
    let tracker = AttemptTracker::default();

    let t = tracker.clone();
    let result: FetcherResult<()> = call_with_retry(&policy, "op", move || {
        let t = t.clone();
        async move {
            t.record();
            Err(FetcherError::ApiError {
                code: 100,
                message: "Invalid API Key".to_string(),
            })
        }
    })
    .await;

    assert!(matches!(result, Err(FetcherError::ApiError { code: 100, .. })));
    assert_eq!(tracker.total(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_backoff_sequence_respects_cap() {
    // 5 attempts, 2s initial, 5s cap -> delays 2, 4, 5, 5 = 16s total
    let policy = RetryPolicy::new(5, Duration::from_secs(2), Duration::from_secs(5));
    let tracker = AttemptTracker::default();
    let started = Instant::now();

    let t = tracker.clone();
    let result: FetcherResult<()> = call_with_retry(&policy, "op", move || {
        let t = t.clone();
        async move {
            t.record();
            Err(FetcherError::NetworkError("connection reset".to_string()))
        }
    })
    .await;

    assert!(result.is_err());
    assert_eq!(tracker.total(), 5);
    assert_eq!(started.elapsed(), Duration::from_secs(16));
}

#[tokio::test(start_paused = true)]
async fn test_single_attempt_policy_fails_without_delay() {
    let policy = RetryPolicy::new(1, Duration::from_secs(2), Duration::from_secs(60));
    let tracker = AttemptTracker::default();
    let started = Instant::now();

    let t = tracker.clone();
    let result: FetcherResult<()> = call_with_retry(&policy, "op", move || {
        let t = t.clone();
        async move {
            t.record();
            Err(FetcherError::ServerError(503))
        }
    })
    .await;

    assert!(matches!(result, Err(FetcherError::ServerError(503))));
    assert_eq!(tracker.total(), 1);
    assert_eq!(started.elapsed(), Duration::ZERO);
}
