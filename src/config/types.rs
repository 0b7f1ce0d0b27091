use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure for Ebook-Mirror
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Returns the URL the crawl starts from
    ///
    /// Falls back to the site base with a trailing separator when no explicit
    /// overview URL is configured.
    pub fn overview_url(&self) -> String {
        match &self.site.overview_url {
            Some(url) => url.clone(),
            None => format!("{}/", self.site.base_url.trim_end_matches('/')),
        }
    }
}

/// The catalog site being mirrored
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site base URL, stripped from detail URLs to form listing slugs
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// First overview page (defaults to the base URL)
    #[serde(rename = "overview-url")]
    pub overview_url: Option<String>,

    /// Hosts download links must point at (e.g. "files.example.com" or "*.example.com")
    #[serde(rename = "asset-hosts")]
    pub asset_hosts: Vec<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://www.allitebooks.com".to_string(),
            overview_url: None,
            asset_hosts: vec!["file.allitebooks.com".to_string()],
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of detail pages processed at once
    #[serde(rename = "max-concurrent-listings")]
    pub max_concurrent_listings: u32,

    /// Whole-request timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,

    /// Maximum number of overview pages to walk, 0 for no limit
    #[serde(rename = "max-pages")]
    pub max_pages: u32,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_listings: 4,
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            max_pages: 0,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "ebook-mirror".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Root directory listings are mirrored into
    pub destination: Option<PathBuf>,

    /// File name the listing description is written to
    #[serde(rename = "description-file")]
    pub description_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            destination: None,
            description_file: "description.txt".to_string(),
        }
    }
}
