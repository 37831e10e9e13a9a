//! CSV sink implementation
//!
//! Append-only delimited output. The file handle is acquired, written,
//! flushed and released once per date; the header row is written only when
//! the file does not yet exist.

use chrono::NaiveDate;
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::{OutputError, OutputResult, StatsSink};
use crate::PhotoStat;

/// Header row, written exactly once per output file.
const HEADER: [&str; 7] = [
    "Date",
    "Photo ID",
    "Photo Title",
    "Daily Views",
    "Daily Favorites",
    "Secret",
    "Server",
];

/// Field delimiter for the output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    /// Tab-separated (the historical default)
    #[default]
    Tab,
    /// Comma-separated
    Comma,
}

impl Delimiter {
    /// Byte value handed to the csv writer.
    pub fn as_byte(&self) -> u8 {
        match self {
            Delimiter::Tab => b'\t',
            Delimiter::Comma => b',',
        }
    }
}

impl std::str::FromStr for Delimiter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tab" | "\t" => Ok(Delimiter::Tab),
            "comma" | "," => Ok(Delimiter::Comma),
            _ => Err(format!("invalid delimiter: {s}. Valid options: tab, comma")),
        }
    }
}

/// One output row.
#[derive(Debug, Serialize)]
struct StatsRow<'a> {
    date: String,
    photo_id: &'a str,
    photo_title: &'a str,
    daily_views: u64,
    daily_favorites: u64,
    secret: &'a str,
    server: &'a str,
}

impl<'a> StatsRow<'a> {
    fn new(date: NaiveDate, stat: &'a PhotoStat) -> Self {
        Self {
            date: date.format("%Y-%m-%d").to_string(),
            photo_id: &stat.id,
            photo_title: &stat.title,
            daily_views: stat.views,
            daily_favorites: stat.favorites,
            secret: &stat.secret,
            server: &stat.server,
        }
    }
}

/// Append-only CSV sink for photo statistics.
pub struct CsvSink {
    path: PathBuf,
    delimiter: Delimiter,
}

impl CsvSink {
    /// Create a sink writing to `path` with the given delimiter.
    pub fn new<P: AsRef<Path>>(path: P, delimiter: Delimiter) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            delimiter,
        }
    }

    /// Destination path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StatsSink for CsvSink {
    fn append(&mut self, date: NaiveDate, records: &[PhotoStat]) -> OutputResult<usize> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| OutputError::IoError(format!("failed to create directory: {e}")))?;
            }
        }

        let existed = self.path.exists();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                OutputError::IoError(format!("failed to open {}: {e}", self.path.display()))
            })?;

        let mut writer = WriterBuilder::new()
            .delimiter(self.delimiter.as_byte())
            .has_headers(false)
            .from_writer(BufWriter::new(file));

        if !existed {
            debug!(path = %self.path.display(), "new output file, writing header");
            writer
                .write_record(HEADER)
                .map_err(|e| OutputError::CsvError(format!("failed to write header: {e}")))?;
        }

        for stat in records {
            writer
                .serialize(StatsRow::new(date, stat))
                .map_err(|e| OutputError::CsvError(format!("failed to write row: {e}")))?;
        }

        writer
            .flush()
            .map_err(|e| OutputError::FlushError(format!("failed to flush: {e}")))?;

        let buf_writer = writer
            .into_inner()
            .map_err(|e| OutputError::IoError(format!("failed to get inner writer: {e}")))?;
        let file = buf_writer
            .into_inner()
            .map_err(|e| OutputError::IoError(format!("failed to get file handle: {e}")))?;
        file.sync_all()
            .map_err(|e| OutputError::IoError(format!("failed to sync file: {e}")))?;

        info!(
            %date,
            rows = records.len(),
            path = %self.path.display(),
            "appended records"
        );
        Ok(records.len())
    }
}
