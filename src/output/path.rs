//! Output file naming
//!
//! A single-date run writes `flickr_stats_<date>.csv`; a range run writes
//! `flickr_stats_<start>_to_<end>.csv`.

use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// Build the output path for a date range under `dir`.
pub fn stats_csv_path(dir: &Path, start: NaiveDate, end: NaiveDate) -> PathBuf {
    let start_str = start.format("%Y-%m-%d");
    let filename = if start == end {
        format!("flickr_stats_{start_str}.csv")
    } else {
        format!("flickr_stats_{start_str}_to_{}.csv", end.format("%Y-%m-%d"))
    };
    dir.join(filename)
}
