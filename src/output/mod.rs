//! Data output sinks

use chrono::NaiveDate;

use crate::PhotoStat;

pub mod csv;
pub mod path;

/// Output writer errors
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// IO error
    #[error("IO error: {0}")]
    IoError(String),

    /// CSV write error
    #[error("CSV error: {0}")]
    CsvError(String),

    /// Buffer flush error
    #[error("flush error: {0}")]
    FlushError(String),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Destination for fetched records, keyed by date.
pub trait StatsSink {
    /// Append `records` for `date`, returning the number of rows written.
    ///
    /// An empty slice is a valid call: the sink still ensures the
    /// destination (and its header) exists.
    fn append(&mut self, date: NaiveDate, records: &[PhotoStat]) -> OutputResult<usize>;
}
