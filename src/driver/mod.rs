//! Date-range orchestration
//!
//! Enumerates every calendar day in an inclusive range and runs one
//! fetch-and-sink cycle per date, strictly in order. A date that fails
//! definitively is logged and skipped; the range run never aborts because
//! of one bad date. Sink errors, by contrast, abort the run.

use chrono::{Days, NaiveDate};
use tracing::{error, info, warn};

use crate::fetcher::{FetchOutcome, StatsFetcher};
use crate::output::{OutputError, StatsSink};

/// Driver errors
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// End date precedes start date
    #[error("invalid range: end date {end} precedes start date {start}")]
    InvalidRange {
        /// Range start
        start: NaiveDate,
        /// Range end
        end: NaiveDate,
    },

    /// Sink write failure
    #[error("output error: {0}")]
    OutputError(#[from] OutputError),
}

/// Result type for driver operations
pub type DriverResult<T> = Result<T, DriverError>;

/// Tally of one range run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeSummary {
    /// Dates fetched completely (including legitimately empty dates)
    pub complete: usize,
    /// Dates written with partial data
    pub partial: usize,
    /// Dates skipped after a definitive fetch failure
    pub failed: usize,
    /// Total records appended to the sink
    pub records_written: u64,
}

/// Every calendar date from `start` to `end` inclusive, ascending.
///
/// Month, year and leap-day boundaries come from chrono's calendar
/// arithmetic. Returns an empty vector when `end < start`.
pub fn enumerate_dates(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut current = start;
    while current <= end {
        dates.push(current);
        match current.checked_add_days(Days::new(1)) {
            Some(next) => current = next,
            None => break,
        }
    }
    dates
}

/// Orchestrates per-date fetches and sink writes over a date range.
pub struct RangeDriver<F, S> {
    fetcher: F,
    sink: S,
}

impl<F: StatsFetcher, S: StatsSink> RangeDriver<F, S> {
    /// Create a driver from a fetcher and a sink.
    pub fn new(fetcher: F, sink: S) -> Self {
        Self { fetcher, sink }
    }

    /// Process every date from `start` to `end` inclusive.
    ///
    /// Each date runs to completion (success, partial or failure) before
    /// the next begins; there is no range-level retry.
    pub async fn run(&mut self, start: NaiveDate, end: NaiveDate) -> DriverResult<RangeSummary> {
        if end < start {
            return Err(DriverError::InvalidRange { start, end });
        }

        let mut summary = RangeSummary::default();

        for date in enumerate_dates(start, end) {
            info!(%date, "processing date");
            match self.fetcher.fetch_date(date).await {
                FetchOutcome::Complete(records) => {
                    let written = self.sink.append(date, &records)?;
                    summary.complete += 1;
                    summary.records_written += written as u64;
                    info!(%date, records = written, "date complete");
                }
                FetchOutcome::Partial {
                    records,
                    failed_page,
                    reason,
                } => {
                    warn!(%date, failed_page, %reason, "writing partial data");
                    let written = self.sink.append(date, &records)?;
                    summary.partial += 1;
                    summary.records_written += written as u64;
                }
                FetchOutcome::Failed { reason } => {
                    error!(%date, %reason, "fetch failed, skipping date");
                    summary.failed += 1;
                }
            }
        }

        Ok(summary)
    }
}
