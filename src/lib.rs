//! # Flickr Stats Downloader Library
//!
//! A library for downloading daily "popular photos" statistics from the
//! Flickr API and appending them to delimited CSV files.
//!
//! ## Features
//!
//! - **Resilient API calls**: exponential backoff retry for rate limits and
//!   transient network failures
//! - **Pagination**: assembles the complete result set for a date across all
//!   pages, with an explicit partial outcome when pagination is cut short
//! - **Date ranges**: fetches every calendar day in an inclusive range, one
//!   date at a time, skipping dates that fail definitively
//! - **Append-only CSV output**: header written once per file, tab or comma
//!   delimited
//!
//! ## Quick Start
//!
//! ```no_run
//! use flickr_stats_downloader::config::RetryPolicy;
//! use flickr_stats_downloader::driver::RangeDriver;
//! use flickr_stats_downloader::fetcher::flickr_http::{AuthContext, FlickrHttpClient};
//! use flickr_stats_downloader::fetcher::popular::PopularPhotosFetcher;
//! use flickr_stats_downloader::output::csv::{CsvSink, Delimiter};
//! use chrono::NaiveDate;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let auth = AuthContext::new("api-key", "oauth-token");
//! let client = FlickrHttpClient::new(auth, RetryPolicy::default());
//! let fetcher = PopularPhotosFetcher::new(client, 100);
//! let sink = CsvSink::new("flickr_stats_2024-01-01.csv", Delimiter::Tab);
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let mut driver = RangeDriver::new(fetcher, sink);
//! let summary = driver.run(start, start).await?;
//! println!("{} records written", summary.records_written);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`config`] - Retry policy and page-size constants
//! - [`fetcher`] - Resilient HTTP calls and per-date paginated fetching
//! - [`driver`] - Date-range enumeration and per-date orchestration
//! - [`output`] - CSV sink and output-path naming
//! - [`cli`] - Command-line surface

#![warn(missing_docs)]
#![warn(clippy::all)]

use serde::{Deserialize, Serialize};

/// CLI command implementations
pub mod cli;

/// Retry policy and page-size configuration
pub mod config;

/// Date-range orchestration
pub mod driver;

/// Flickr API client and paginated fetcher
pub mod fetcher;

/// Data output sinks
pub mod output;

pub use fetcher::FetchOutcome;

/// One photo's statistics for a single day.
///
/// All fields pass through opaquely from the upstream API; no validation
/// beyond presence is performed at this layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoStat {
    /// Photo identifier
    pub id: String,
    /// Photo title
    pub title: String,
    /// View count for the day
    pub views: u64,
    /// Favorite count for the day
    pub favorites: u64,
    /// Photo secret token
    pub secret: String,
    /// Server identifier hosting the photo
    pub server: String,
}
