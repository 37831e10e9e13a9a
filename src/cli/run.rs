//! Command-line surface and run wiring

use chrono::{NaiveDate, Utc};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::{RetryPolicy, DEFAULT_MAX_ATTEMPTS, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::driver::RangeDriver;
use crate::fetcher::flickr_http::{AuthContext, FlickrHttpClient, DEFAULT_BASE_URL};
use crate::fetcher::popular::PopularPhotosFetcher;
use crate::output::csv::{CsvSink, Delimiter};
use crate::output::path::stats_csv_path;

use super::CliError;

/// Parse and validate a page-size value (service maximum 500).
fn parse_page_size(s: &str) -> Result<u32, String> {
    let value: u32 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if value == 0 {
        return Err("page size must be at least 1".to_string());
    }
    if value > MAX_PAGE_SIZE {
        return Err(format!(
            "page size {value} exceeds service maximum of {MAX_PAGE_SIZE}"
        ));
    }
    Ok(value)
}

/// Flickr Stats Downloader CLI
#[derive(Parser, Debug)]
#[command(name = "flickr-stats-downloader")]
#[command(about = "Download daily popular-photo statistics from Flickr into CSV files", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: String,

    /// End date (YYYY-MM-DD); defaults to the start date
    #[arg(long)]
    pub end_date: Option<String>,

    /// Flickr API key
    #[arg(long, env = "FLICKR_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Pre-obtained OAuth access token
    #[arg(long, env = "FLICKR_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: String,

    /// Photos per page (default: 100, max: 500)
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE, value_parser = parse_page_size)]
    pub page_size: u32,

    /// Total attempts per API call, including the first
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_retries: u32,

    /// Initial retry backoff delay in seconds
    #[arg(long, default_value_t = 2)]
    pub initial_backoff_secs: u64,

    /// Maximum retry backoff delay in seconds
    #[arg(long, default_value_t = 60)]
    pub max_backoff_secs: u64,

    /// Output field delimiter: tab or comma
    #[arg(long, default_value = "tab")]
    pub delimiter: Delimiter,

    /// Directory for the output CSV file
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Flickr REST endpoint
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Proceed without confirmation when dates lie in the future
    #[arg(long, short = 'y')]
    pub yes: bool,
}

fn parse_date(input: &str, label: &str) -> Result<NaiveDate, CliError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|e| CliError::InvalidArgument(format!("invalid {label} '{input}': {e}")))
}

/// Ask the user whether to continue; any answer other than `y`/`yes`
/// declines.
fn confirm_on_stdin(prompt: &str) -> bool {
    print!("{prompt} (y/n): ");
    let _ = std::io::stdout().flush();
    let mut answer = String::new();
    if std::io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

impl Cli {
    /// Validate the date range, returning `(start, end)`.
    pub fn resolve_dates(&self) -> Result<(NaiveDate, NaiveDate), CliError> {
        let start = parse_date(&self.start_date, "start date")?;
        let end = match &self.end_date {
            Some(raw) => parse_date(raw, "end date")?,
            None => start,
        };
        if end < start {
            return Err(CliError::InvalidArgument(format!(
                "end date {end} precedes start date {start}"
            )));
        }
        Ok((start, end))
    }

    /// Run the fetch-and-append operation for the configured range.
    pub async fn execute(&self) -> Result<(), CliError> {
        let (start, end) = self.resolve_dates()?;

        let today = Utc::now().date_naive();
        if end > today && !self.yes {
            warn!(%end, %today, "requested range extends into the future; data may not exist yet");
            if !confirm_on_stdin("Range includes future dates. Continue anyway?") {
                info!("aborted by user, nothing written");
                return Ok(());
            }
        }

        if self.max_retries == 0 {
            return Err(CliError::InvalidArgument(
                "max retries must be at least 1".to_string(),
            ));
        }

        let policy = RetryPolicy::new(
            self.max_retries,
            Duration::from_secs(self.initial_backoff_secs),
            Duration::from_secs(self.max_backoff_secs),
        );
        let auth = AuthContext::new(&self.api_key, &self.access_token);
        let client = FlickrHttpClient::new(auth, policy).with_base_url(&self.base_url);

        // Fail fast on bad credentials before any file is touched
        let login = client
            .verify_credentials()
            .await
            .map_err(|e| CliError::CredentialError(e.to_string()))?;
        info!(user = %login.user.id, "credentials verified");

        let output_path = stats_csv_path(&self.output_dir, start, end);
        info!(path = %output_path.display(), %start, %end, "starting range run");

        let fetcher = PopularPhotosFetcher::new(client, self.page_size);
        let sink = CsvSink::new(&output_path, self.delimiter);
        let mut driver = RangeDriver::new(fetcher, sink);

        let summary = driver.run(start, end).await?;
        info!(
            complete = summary.complete,
            partial = summary.partial,
            failed = summary.failed,
            records = summary.records_written,
            path = %output_path.display(),
            "range run finished"
        );
        Ok(())
    }
}
