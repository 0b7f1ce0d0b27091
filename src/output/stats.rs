//! Run statistics
//!
//! Counters accumulated while a crawl runs and the end-of-run summary.

use crate::state::ListingOutcome;
use chrono::{DateTime, Utc};

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    /// When the crawl started
    pub started_at: DateTime<Utc>,

    /// When the crawl finished, unset while it runs
    pub finished_at: Option<DateTime<Utc>>,

    /// Overview pages loaded and parsed
    pub overview_pages: u64,

    /// Detail page links found across all overview pages
    pub listings_found: u64,

    /// Listings mirrored by this run
    pub listings_downloaded: u64,

    /// Listings skipped because they were already mirrored
    pub listings_skipped: u64,

    /// Listings abandoned after an error
    pub listings_failed: u64,

    /// Files written by this run
    pub files_downloaded: u64,

    /// Bytes written across those files
    pub bytes_downloaded: u64,

    /// Detail URLs of failed listings, for a manual re-run
    pub failed_urls: Vec<String>,
}

impl CrawlStatistics {
    /// Starts a fresh set of counters
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            overview_pages: 0,
            listings_found: 0,
            listings_downloaded: 0,
            listings_skipped: 0,
            listings_failed: 0,
            files_downloaded: 0,
            bytes_downloaded: 0,
            failed_urls: Vec::new(),
        }
    }

    /// Records a parsed overview page and the listings it linked to
    pub fn record_overview_page(&mut self, listings: usize) {
        self.overview_pages += 1;
        self.listings_found += listings as u64;
    }

    /// Records how one listing ended
    pub fn record_listing(&mut self, url: &str, outcome: &ListingOutcome) {
        match outcome {
            ListingOutcome::Downloaded { files, bytes } => {
                self.listings_downloaded += 1;
                self.files_downloaded += *files as u64;
                self.bytes_downloaded += bytes;
            }
            ListingOutcome::Skipped => self.listings_skipped += 1,
            ListingOutcome::Failed { .. } => {
                self.listings_failed += 1;
                self.failed_urls.push(url.to_string());
            }
        }
    }

    /// Marks the crawl as finished
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Wall-clock duration of the run so far
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at.unwrap_or_else(Utc::now) - self.started_at
    }
}

impl Default for CrawlStatistics {
    fn default() -> Self {
        Self::new()
    }
}

/// Logs the statistics summary
///
/// # Arguments
///
/// * `stats` - The statistics to report
pub fn log_statistics(stats: &CrawlStatistics) {
    tracing::info!(
        "Crawl finished in {}s: {} overview pages, {} listings found",
        stats.elapsed().num_seconds(),
        stats.overview_pages,
        stats.listings_found
    );
    tracing::info!(
        "Listings: {} downloaded, {} skipped, {} failed",
        stats.listings_downloaded,
        stats.listings_skipped,
        stats.listings_failed
    );
    tracing::info!(
        "Files: {} ({} bytes)",
        stats.files_downloaded,
        stats.bytes_downloaded
    );

    for url in &stats.failed_urls {
        tracing::warn!("Not mirrored: {}", url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crawl_statistics_creation() {
        let stats = CrawlStatistics::new();

        assert_eq!(stats.overview_pages, 0);
        assert_eq!(stats.listings_found, 0);
        assert!(stats.finished_at.is_none());
        assert!(stats.failed_urls.is_empty());
    }

    #[test]
    fn test_record_overview_page() {
        let mut stats = CrawlStatistics::new();
        stats.record_overview_page(10);
        stats.record_overview_page(3);

        assert_eq!(stats.overview_pages, 2);
        assert_eq!(stats.listings_found, 13);
    }

    #[test]
    fn test_record_listing_outcomes() {
        let mut stats = CrawlStatistics::new();
        stats.record_listing(
            "http://site/a/",
            &ListingOutcome::Downloaded { files: 2, bytes: 300 },
        );
        stats.record_listing("http://site/b/", &ListingOutcome::Skipped);
        stats.record_listing(
            "http://site/c/",
            &ListingOutcome::Failed {
                error: "HTTP status 500".to_string(),
            },
        );

        assert_eq!(stats.listings_downloaded, 1);
        assert_eq!(stats.files_downloaded, 2);
        assert_eq!(stats.bytes_downloaded, 300);
        assert_eq!(stats.listings_skipped, 1);
        assert_eq!(stats.listings_failed, 1);
        assert_eq!(stats.failed_urls, vec!["http://site/c/".to_string()]);
    }

    #[test]
    fn test_finish_sets_end_time() {
        let mut stats = CrawlStatistics::new();
        stats.finish();

        assert!(stats.finished_at.is_some());
        assert!(stats.elapsed() >= chrono::Duration::zero());
    }
}
