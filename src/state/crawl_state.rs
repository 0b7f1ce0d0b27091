//! Pagination state machine driving a crawl
//!
//! The crawl starts awaiting the catalog's first overview page. Parsing an
//! overview page yields its listings together with the next page URL; once the
//! listings are processed the machine either awaits that next page or, when no
//! next page exists, finishes.

use std::fmt;

/// Represents the current position of the crawl within the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlState {
    /// The overview page at `url` still has to be loaded and parsed
    AwaitingOverviewPage { url: String },

    /// Listings from one overview page are being processed
    ProcessingListings {
        /// Detail page URLs found on the overview page, in document order
        urls: Vec<String>,
        /// Next overview page, `None` when the catalog is exhausted
        next_page: Option<String>,
    },

    /// Pagination is exhausted
    Done,
}

impl CrawlState {
    /// Creates the initial state for a crawl starting at `overview_url`
    pub fn start(overview_url: impl Into<String>) -> Self {
        Self::AwaitingOverviewPage {
            url: overview_url.into(),
        }
    }

    /// Moves from an awaited overview page to processing its listings
    ///
    /// Both values must come from the same loaded page.
    pub fn overview_parsed(urls: Vec<String>, next_page: Option<String>) -> Self {
        Self::ProcessingListings { urls, next_page }
    }

    /// Advances past a processed overview page
    ///
    /// # Returns
    ///
    /// * `AwaitingOverviewPage` - when the page linked to a next page
    /// * `Done` - when it did not
    pub fn listings_processed(next_page: Option<String>) -> Self {
        match next_page {
            Some(url) => Self::AwaitingOverviewPage { url },
            None => Self::Done,
        }
    }

    /// Returns true once the crawl has nothing left to do
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns the snake_case name of this state
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AwaitingOverviewPage { .. } => "awaiting_overview_page",
            Self::ProcessingListings { .. } => "processing_listings",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AwaitingOverviewPage { url } => write!(f, "awaiting overview page {}", url),
            Self::ProcessingListings { urls, .. } => {
                write!(f, "processing {} listings", urls.len())
            }
            Self::Done => write!(f, "done"),
        }
    }
}
