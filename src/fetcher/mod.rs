//! Flickr API client and paginated fetcher implementations

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::PhotoStat;

pub mod envelope;
pub mod flickr_http;
pub mod popular;
pub mod retry;

/// Fetcher errors
#[derive(Debug, thiserror::Error)]
pub enum FetcherError {
    /// Rate limit exceeded (HTTP 429 or Flickr error code 105)
    #[error("rate limit exceeded")]
    RateLimitExceeded,

    /// Network/transport error
    #[error("network error: {0}")]
    NetworkError(String),

    /// HTTP server error (5xx)
    #[error("server error: HTTP {0}")]
    ServerError(u16),

    /// Non-retryable HTTP client error
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Flickr API error response (`stat:"fail"` with a non-rate-limit code)
    #[error("API error {code}: {message}")]
    ApiError {
        /// Flickr error code
        code: i64,
        /// Flickr error message
        message: String,
    },

    /// Response present but structurally malformed
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl FetcherError {
    /// Whether a retry with backoff could plausibly fix this error.
    ///
    /// Rate limits, transport hiccups and 5xx responses are transient; a
    /// malformed body or an explicit API error will not change on retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FetcherError::RateLimitExceeded
                | FetcherError::NetworkError(_)
                | FetcherError::ServerError(_)
        )
    }
}

/// Result type for fetcher operations
pub type FetcherResult<T> = Result<T, FetcherError>;

/// Outcome of one date's paginated fetch.
///
/// Callers must distinguish a partial result from a complete one: a page
/// failure mid-run yields `Partial` with whatever accumulated, never a
/// silently truncated `Complete`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Every declared page was retrieved (zero records is a valid complete
    /// outcome for a date with no popular photos)
    Complete(Vec<PhotoStat>),
    /// Pagination was cut short; records from pages before `failed_page`
    /// are included
    Partial {
        /// Records accumulated before the failure
        records: Vec<PhotoStat>,
        /// Page number that failed after retries
        failed_page: u32,
        /// Why pagination stopped
        reason: String,
    },
    /// Nothing was retrieved for the date
    Failed {
        /// Why the fetch failed
        reason: String,
    },
}

impl FetchOutcome {
    /// Records carried by this outcome, if any.
    pub fn records(&self) -> &[PhotoStat] {
        match self {
            FetchOutcome::Complete(records) => records,
            FetchOutcome::Partial { records, .. } => records,
            FetchOutcome::Failed { .. } => &[],
        }
    }

    /// True for a fully successful fetch.
    pub fn is_complete(&self) -> bool {
        matches!(self, FetchOutcome::Complete(_))
    }
}

/// Source of one page of popular-photo statistics.
///
/// Seam between pagination logic and the HTTP client, so the page loop is
/// testable without a network.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch one page (1-based) for a date at the given page size.
    async fn popular_page(
        &self,
        date: NaiveDate,
        page: u32,
        per_page: u32,
    ) -> FetcherResult<envelope::PhotosEnvelope>;
}

/// Per-date fetcher producing a [`FetchOutcome`].
#[async_trait]
pub trait StatsFetcher: Send + Sync {
    /// Fetch all popular-photo statistics for one date.
    async fn fetch_date(&self, date: NaiveDate) -> FetchOutcome;
}
