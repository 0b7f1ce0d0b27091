//! Crawler module for catalog fetching and mirroring
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with a single-page document cache
//! - Field and listing extraction from catalog pages
//! - Bounded concurrent processing of listings
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod fields;
mod listing;
mod progress;
mod scheduler;

pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{build_http_client, download_file, fetch_page, Document, FetchResult, PageFetcher};
pub use fields::{reduce_children_to_text, FieldExtractor};
pub use listing::{FileDescriptor, ListingExtractor, ListingRecord};
pub use progress::{LoggingProgress, NoProgress, ProgressObserver};
pub use scheduler::WorkerPool;

use crate::config::Config;
use crate::output::CrawlStatistics;
use crate::MirrorError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Validate the configuration and prepare the destination
/// 2. Build the HTTP client
/// 3. Walk the overview pages in order
/// 4. Mirror every listing not already on disk
/// 5. Log the run statistics
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(CrawlStatistics)` - Pagination was exhausted
/// * `Err(MirrorError)` - Invalid configuration or an unreachable overview page
pub async fn crawl(config: Config) -> Result<CrawlStatistics, MirrorError> {
    run_crawl(config).await
}
