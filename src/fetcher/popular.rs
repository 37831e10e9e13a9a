//! Paginated fetch of one date's popular-photo statistics
//!
//! Page 1 doubles as discovery: its envelope declares the total page and
//! record counts. A zero total short-circuits to an empty complete outcome.
//! Remaining pages are fetched in order; a page failure after retries stops
//! iteration and yields a partial outcome carrying everything accumulated
//! so far.

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::config::DEFAULT_PAGE_SIZE;
use crate::fetcher::{FetchOutcome, PageSource, StatsFetcher};
use crate::PhotoStat;

/// Fetcher assembling the complete result set for one date.
pub struct PopularPhotosFetcher<S> {
    source: S,
    page_size: u32,
}

impl<S: PageSource> PopularPhotosFetcher<S> {
    /// Create a fetcher over a page source with the given page size.
    pub fn new(source: S, page_size: u32) -> Self {
        Self { source, page_size }
    }

    /// Create a fetcher with the default page size.
    pub fn with_default_page_size(source: S) -> Self {
        Self::new(source, DEFAULT_PAGE_SIZE)
    }

    /// Page size used for requests.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }
}

#[async_trait]
impl<S: PageSource> StatsFetcher for PopularPhotosFetcher<S> {
    async fn fetch_date(&self, date: NaiveDate) -> FetchOutcome {
        // Discovery: page 1 carries the pagination metadata
        let first = match self.source.popular_page(date, 1, self.page_size).await {
            Ok(envelope) => envelope,
            Err(e) => {
                return FetchOutcome::Failed {
                    reason: format!("page 1 failed for {date}: {e}"),
                }
            }
        };

        let total_pages = first.pages;
        let total_records = first.total;
        info!(%date, total_pages, total_records, "discovered result set");

        if total_records == 0 {
            debug!(%date, "no popular photos for date");
            return FetchOutcome::Complete(Vec::new());
        }

        let mut records: Vec<PhotoStat> =
            first.photos.into_iter().map(PhotoStat::from).collect();

        for page in 2..=total_pages {
            debug!(%date, page, total_pages, "fetching page");
            match self.source.popular_page(date, page, self.page_size).await {
                Ok(envelope) => {
                    records.extend(envelope.photos.into_iter().map(PhotoStat::from));
                }
                Err(e) => {
                    warn!(%date, page, error = %e, "pagination cut short, keeping earlier pages");
                    return FetchOutcome::Partial {
                        records,
                        failed_page: page,
                        reason: format!("page {page} failed for {date}: {e}"),
                    };
                }
            }
        }

        if records.len() as u32 != total_records {
            warn!(
                %date,
                declared = total_records,
                received = records.len(),
                "record count differs from declared total"
            );
        }

        FetchOutcome::Complete(records)
    }
}
