//! Ebook-Mirror: a paginated catalog mirror
//!
//! This crate walks the overview pages of an e-book catalog site, extracts each
//! listing's description and downloadable files, and mirrors them into a local
//! directory tree. Listings whose directory already exists are skipped, so a
//! crawl can be re-run to resume where a previous run stopped.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Ebook-Mirror operations
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Overview page unreachable: {url}")]
    OverviewUnavailable { url: String },

    #[error("Page could not be loaded: {url}")]
    PageUnavailable { url: String },

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("No destination directory given")]
    MissingDestination,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid host pattern: {0}")]
    InvalidPattern(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("URL {url} is not below the site base {base}")]
    OutsideBase { url: String, base: String },

    #[error("URL {0} does not name a listing")]
    EmptySlug(String),

    #[error("Malformed URL: {0}")]
    Malformed(String),
}

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, Document, ListingExtractor, PageFetcher};
pub use state::{CrawlState, ListingOutcome};
pub use crate::url::{file_name_from_url, listing_slug, matches_wildcard};
