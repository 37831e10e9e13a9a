//! Integration tests for the date-range driver with a real CSV sink

use async_trait::async_trait;
use chrono::NaiveDate;
use flickr_stats_downloader::driver::{DriverError, RangeDriver};
use flickr_stats_downloader::fetcher::{FetchOutcome, StatsFetcher};
use flickr_stats_downloader::output::csv::{CsvSink, Delimiter};
use flickr_stats_downloader::output::path::stats_csv_path;
use flickr_stats_downloader::PhotoStat;
use std::collections::HashMap;
use tempfile::TempDir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn stat(id: &str, views: u64) -> PhotoStat {
    PhotoStat {
        id: id.to_string(),
        title: format!("Photo {id}"),
        views,
        favorites: 1,
        secret: "sec".to_string(),
        server: "65535".to_string(),
    }
}

/// Fetcher returning a scripted outcome per date
struct ScriptedFetcher {
    outcomes: HashMap<NaiveDate, FetchOutcome>,
}

#[async_trait]
impl StatsFetcher for ScriptedFetcher {
    async fn fetch_date(&self, date: NaiveDate) -> FetchOutcome {
        self.outcomes
            .get(&date)
            .cloned()
            .unwrap_or(FetchOutcome::Complete(Vec::new()))
    }
}

#[tokio::test]
async fn test_failed_date_is_skipped_and_range_continues() {
    let dir = TempDir::new().unwrap();
    let start = date(2024, 1, 1);
    let end = date(2024, 1, 3);
    let path = stats_csv_path(dir.path(), start, end);

    let mut outcomes = HashMap::new();
    outcomes.insert(
        start,
        FetchOutcome::Complete(vec![stat("a1", 10), stat("a2", 20)]),
    );
    outcomes.insert(
        date(2024, 1, 2),
        FetchOutcome::Failed {
            reason: "retries exhausted".to_string(),
        },
    );
    outcomes.insert(
        end,
        FetchOutcome::Partial {
            records: vec![stat("c1", 30)],
            failed_page: 2,
            reason: "page 2 failed".to_string(),
        },
    );

    let fetcher = ScriptedFetcher { outcomes };
    let sink = CsvSink::new(&path, Delimiter::Tab);
    let mut driver = RangeDriver::new(fetcher, sink);

    let summary = driver.run(start, end).await.unwrap();
    assert_eq!(summary.complete, 1);
    assert_eq!(summary.partial, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.records_written, 3);

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 4); // header + 3 rows
    assert!(lines[1].starts_with("2024-01-01\ta1"));
    assert!(lines[2].starts_with("2024-01-01\ta2"));
    // The failed date contributes nothing; partial rows follow directly
    assert!(lines[3].starts_with("2024-01-03\tc1"));
}

#[tokio::test]
async fn test_empty_range_produces_header_only_file() {
    let dir = TempDir::new().unwrap();
    let start = date(2024, 2, 1);
    let end = date(2024, 2, 2);
    let path = stats_csv_path(dir.path(), start, end);

    let fetcher = ScriptedFetcher {
        outcomes: HashMap::new(),
    };
    let sink = CsvSink::new(&path, Delimiter::Tab);
    let mut driver = RangeDriver::new(fetcher, sink);

    let summary = driver.run(start, end).await.unwrap();
    assert_eq!(summary.complete, 2);
    assert_eq!(summary.records_written, 0);

    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents.lines().count(), 1);
    assert!(contents.starts_with("Date\t"));
}

#[tokio::test]
async fn test_reversed_range_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.csv");

    let fetcher = ScriptedFetcher {
        outcomes: HashMap::new(),
    };
    let sink = CsvSink::new(&path, Delimiter::Tab);
    let mut driver = RangeDriver::new(fetcher, sink);

    let result = driver.run(date(2024, 1, 5), date(2024, 1, 1)).await;
    assert!(matches!(result, Err(DriverError::InvalidRange { .. })));
    assert!(!path.exists());
}

#[tokio::test]
async fn test_rerun_produces_byte_identical_output() {
    let dir = TempDir::new().unwrap();
    let start = date(2024, 1, 1);
    let end = date(2024, 1, 2);

    let outcomes: HashMap<NaiveDate, FetchOutcome> = [
        (start, FetchOutcome::Complete(vec![stat("a", 5)])),
        (end, FetchOutcome::Complete(vec![stat("b", 6)])),
    ]
    .into_iter()
    .collect();

    let path_a = dir.path().join("run_a.csv");
    let fetcher = ScriptedFetcher {
        outcomes: outcomes.clone(),
    };
    let mut driver = RangeDriver::new(fetcher, CsvSink::new(&path_a, Delimiter::Tab));
    driver.run(start, end).await.unwrap();

    let path_b = dir.path().join("run_b.csv");
    let fetcher = ScriptedFetcher { outcomes };
    let mut driver = RangeDriver::new(fetcher, CsvSink::new(&path_b, Delimiter::Tab));
    driver.run(start, end).await.unwrap();

    assert_eq!(
        std::fs::read(&path_a).unwrap(),
        std::fs::read(&path_b).unwrap()
    );
}

#[tokio::test]
async fn test_single_date_range_collapses_to_one_fetch() {
    let dir = TempDir::new().unwrap();
    let day = date(2024, 6, 1);
    let path = stats_csv_path(dir.path(), day, day);
    assert!(path.ends_with("flickr_stats_2024-06-01.csv"));

    let outcomes: HashMap<NaiveDate, FetchOutcome> =
        [(day, FetchOutcome::Complete(vec![stat("x", 1)]))]
            .into_iter()
            .collect();

    let fetcher = ScriptedFetcher { outcomes };
    let mut driver = RangeDriver::new(fetcher, CsvSink::new(&path, Delimiter::Tab));
    let summary = driver.run(day, day).await.unwrap();

    assert_eq!(summary.complete, 1);
    assert_eq!(summary.records_written, 1);
}
