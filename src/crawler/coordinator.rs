//! Crawler coordinator - main crawl orchestration logic
//!
//! This module walks the catalog's overview pages one at a time and mirrors
//! the listings found on each page through a bounded worker pool:
//! - Loading and parsing each overview page
//! - Skipping listings whose directory already exists
//! - Writing descriptions and downloading files
//! - Isolating failures to the listing they happened in

use crate::config::{validate, Config};
use crate::crawler::fetcher::{build_http_client, download_file, PageFetcher};
use crate::crawler::listing::ListingExtractor;
use crate::crawler::progress::LoggingProgress;
use crate::crawler::scheduler::WorkerPool;
use crate::output::{log_statistics, CrawlStatistics};
use crate::state::{CrawlState, ListingOutcome};
use crate::storage::{Claim, DirectoryStore, ListingStore};
use crate::url::listing_slug;
use crate::{ConfigError, MirrorError};
use reqwest::Client;
use std::collections::HashSet;

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Config,
    client: Client,
    extractor: ListingExtractor,
    store: Box<dyn ListingStore>,
    pool: WorkerPool,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// Validates the configuration and prepares the destination directory.
    /// Nothing touches the network until [`run`](Self::run) is called.
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(MirrorError)` - Invalid configuration or unusable destination
    pub fn new(config: Config) -> Result<Self, MirrorError> {
        validate(&config)?;

        let destination = config
            .output
            .destination
            .clone()
            .ok_or(ConfigError::MissingDestination)?;
        let store = DirectoryStore::new(destination, config.output.description_file.clone())?;

        Self::build(config, Box::new(store))
    }

    /// Creates a coordinator that persists listings into `store`
    pub fn with_store(config: Config, store: Box<dyn ListingStore>) -> Result<Self, MirrorError> {
        validate(&config)?;
        Self::build(config, store)
    }

    /// Assembles a coordinator from an already validated configuration
    fn build(config: Config, store: Box<dyn ListingStore>) -> Result<Self, MirrorError> {
        let client = build_http_client(&config.user_agent, &config.crawler)?;
        let extractor = ListingExtractor::from_config(&config.site);
        let pool = WorkerPool::new(config.crawler.max_concurrent_listings as usize);

        Ok(Self {
            config,
            client,
            extractor,
            store,
            pool,
        })
    }

    /// Runs the main crawl loop
    ///
    /// Overview pages are processed strictly in next-page order. All listings
    /// of one page are finished before the next page is loaded.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlStatistics)` - Pagination was exhausted
    /// * `Err(MirrorError)` - An overview page could not be loaded
    pub async fn run(&self) -> Result<CrawlStatistics, MirrorError> {
        let mut fetcher = PageFetcher::new(self.client.clone());
        let mut stats = CrawlStatistics::new();
        let mut visited = HashSet::new();
        let mut state = CrawlState::start(self.config.overview_url());
        let max_pages = u64::from(self.config.crawler.max_pages);

        tracing::info!(
            "Starting crawl at {} with {} workers",
            self.config.overview_url(),
            self.pool.workers()
        );

        loop {
            tracing::trace!("Crawl state: {}", state);

            state = match state {
                CrawlState::AwaitingOverviewPage { url } => {
                    if max_pages > 0 && stats.overview_pages >= max_pages {
                        tracing::info!("Page limit of {} reached, stopping before {}", max_pages, url);
                        CrawlState::Done
                    } else if !visited.insert(url.clone()) {
                        tracing::warn!("Pagination links back to {}, stopping", url);
                        CrawlState::Done
                    } else {
                        tracing::info!("PAGE: {}", url);

                        if fetcher.load(&url).await.is_none() {
                            tracing::error!("Overview page {} is unreachable, aborting crawl", url);
                            return Err(MirrorError::OverviewUnavailable { url });
                        }

                        let urls = self.extractor.parse_detail_pages(&fetcher);
                        let next_page = self.extractor.parse_next_page(&fetcher);
                        stats.record_overview_page(urls.len());

                        tracing::debug!(
                            "{} listings on {}, next page: {:?}",
                            urls.len(),
                            url,
                            next_page
                        );
                        CrawlState::overview_parsed(urls, next_page)
                    }
                }

                CrawlState::ProcessingListings { urls, next_page } => {
                    let this = self;
                    let outcomes = self
                        .pool
                        .run(urls, move |url| async move {
                            let outcome = this.process_listing(&url).await;
                            (url, outcome)
                        })
                        .await;

                    for (url, outcome) in &outcomes {
                        stats.record_listing(url, outcome);
                    }

                    CrawlState::listings_processed(next_page)
                }

                CrawlState::Done => break,
            };
        }

        stats.finish();
        log_statistics(&stats);

        Ok(stats)
    }

    /// Processes a single detail URL
    ///
    /// Every error is caught here, logged with the URL, and turned into
    /// [`ListingOutcome::Failed`]; a failed listing's directory is removed so
    /// the next run tries it again.
    pub async fn process_listing(&self, url: &str) -> ListingOutcome {
        tracing::info!("DETAIL: {}", url);

        let slug = match listing_slug(&self.config.site.base_url, url) {
            Ok(slug) => slug,
            Err(e) => {
                tracing::error!("Cannot mirror {}: {}", url, e);
                return ListingOutcome::Failed {
                    error: e.to_string(),
                };
            }
        };

        match self.store.claim(&slug).await {
            Ok(Claim::AlreadyPresent) => {
                tracing::info!("→ skipped {} (already downloaded)", slug);
                return ListingOutcome::Skipped;
            }
            Ok(Claim::Claimed(_)) => {}
            Err(e) => {
                tracing::error!("Cannot create listing directory for {}: {}", url, e);
                return ListingOutcome::Failed {
                    error: e.to_string(),
                };
            }
        }

        match self.mirror_listing(url, &slug).await {
            Ok((files, bytes)) => ListingOutcome::Downloaded { files, bytes },
            Err(e) => {
                tracing::error!("Error processing {}: {}", url, e);

                if let Err(release_error) = self.store.release(&slug).await {
                    tracing::warn!(
                        "Could not remove partial listing {}: {}",
                        slug,
                        release_error
                    );
                }

                ListingOutcome::Failed {
                    error: e.to_string(),
                }
            }
        }
    }

    /// Loads a claimed listing's detail page and writes everything it offers
    ///
    /// Returns the number of files and bytes written.
    async fn mirror_listing(&self, url: &str, slug: &str) -> Result<(usize, u64), MirrorError> {
        let mut fetcher = PageFetcher::new(self.client.clone());
        if fetcher.load(url).await.is_none() {
            return Err(MirrorError::PageUnavailable {
                url: url.to_string(),
            });
        }

        let record = self.extractor.parse_detail_page(&fetcher);
        drop(fetcher);

        self.store.write_description(slug, &record.description).await?;

        if record.files.is_empty() {
            tracing::warn!("No downloadable files found on {}", url);
        }

        let mut bytes = 0;
        for file in &record.files {
            let dest = self.store.file_path(slug, &file.name)?;
            let progress = LoggingProgress::new(file.url.as_str());
            bytes += download_file(&self.client, &file.url, &dest, &progress).await?;
        }

        Ok((record.files.len(), bytes))
    }

    /// The configuration this coordinator runs with
    pub fn config(&self) -> &Config {
        &self.config
    }
}

/// Runs the main crawl operation
///
/// # Example
///
/// ```no_run
/// use ebook_mirror::config::Config;
/// use ebook_mirror::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut config = Config::default();
/// config.output.destination = Some("/data/ebooks".into());
/// let stats = run_crawl(config).await?;
/// println!("{} listings mirrored", stats.listings_downloaded);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<CrawlStatistics, MirrorError> {
    let coordinator = Coordinator::new(config)?;
    coordinator.run().await
}
