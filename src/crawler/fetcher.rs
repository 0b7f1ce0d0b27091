//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the HTTP client with the configured user agent and timeouts
//! - Loading catalog pages into queryable [`Document`]s
//! - Remembering the most recently loaded page so repeated loads are free
//! - Streaming downloadable files to disk with progress reporting

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::crawler::progress::ProgressObserver;
use crate::storage::StorageError;
use crate::MirrorError;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use scraper::Html;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use url::Url;

/// An immutable, queryable parse of one page's markup
#[derive(Debug)]
pub struct Document {
    url: String,
    html: Html,
}

impl Document {
    /// Parses `markup` loaded from `url`
    ///
    /// HTML parsing is error-tolerant; malformed markup still yields a tree.
    pub fn parse(url: impl Into<String>, markup: &str) -> Self {
        Self {
            url: url.into(),
            html: Html::parse_document(markup),
        }
    }

    /// The URL this document was loaded from
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The parsed markup tree
    pub fn html(&self) -> &Html {
        &self.html
    }

    /// Resolves an href found on this page to an absolute http(s) URL
    ///
    /// Returns None for empty, fragment-only, and non-HTTP links.
    pub fn resolve(&self, href: &str) -> Option<Url> {
        let href = href.trim();
        if href.is_empty() || href.starts_with('#') {
            return None;
        }

        let resolved = match Url::parse(&self.url) {
            Ok(base) => base.join(href).ok()?,
            Err(_) => Url::parse(href).ok()?,
        };

        matches!(resolved.scheme(), "http" | "https").then_some(resolved)
    }
}

/// Result of a page fetch
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// Page body content
        body: String,
    },

    /// Page is not HTML (Content-Type mismatch)
    ContentMismatch {
        /// The actual Content-Type received
        content_type: String,
    },

    /// Server answered with a non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, body read failure)
    NetworkError {
        /// Error description
        error: String,
    },
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use ebook_mirror::config::{CrawlerConfig, UserAgentConfig};
/// use ebook_mirror::crawler::build_http_client;
///
/// let client =
///     build_http_client(&UserAgentConfig::default(), &CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    crawler: &CrawlerConfig,
) -> Result<Client, reqwest::Error> {
    // Format: CrawlerName/Version
    let user_agent = format!("{}/{}", user_agent.crawler_name, user_agent.crawler_version);

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(crawler.request_timeout_secs))
        .connect_timeout(Duration::from_secs(crawler.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page and classifies the outcome
///
/// A missing Content-Type is accepted; one that does not mention HTML is not.
pub async fn fetch_page(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            let error = if e.is_timeout() {
                "Request timeout".to_string()
            } else if e.is_connect() {
                "Connection refused".to_string()
            } else {
                e.to_string()
            };
            return FetchResult::NetworkError { error };
        }
    };

    let status = response.status();
    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let final_url = response.url().to_string();

    if let Some(content_type) = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    {
        if !content_type.to_ascii_lowercase().contains("html") {
            return FetchResult::ContentMismatch {
                content_type: content_type.to_string(),
            };
        }
    }

    match response.text().await {
        Ok(body) => FetchResult::Success { final_url, body },
        Err(e) => FetchResult::NetworkError {
            error: e.to_string(),
        },
    }
}

/// Loads pages and keeps the most recently loaded one
///
/// The cache holds exactly one `(url, Document)` pair keyed by the requested
/// URL: loading the same URL twice in a row costs a single request. The
/// document itself carries the URL after redirects, which is what its links
/// resolve against. A failed load returns `None` and leaves the previous
/// document in place.
#[derive(Debug)]
pub struct PageFetcher {
    client: Client,
    cached: Option<(String, Document)>,
}

impl PageFetcher {
    /// Creates a fetcher with an empty cache
    pub fn new(client: Client) -> Self {
        Self {
            client,
            cached: None,
        }
    }

    /// Loads `url`, returning the parsed document or `None` on any failure
    pub async fn load(&mut self, url: &str) -> Option<&Document> {
        if self.cached.as_ref().is_some_and(|(key, _)| key == url) {
            tracing::debug!("Using cached page: {}", url);
            return self.document();
        }

        match fetch_page(&self.client, url).await {
            FetchResult::Success { final_url, body } => {
                if final_url != url {
                    tracing::debug!("{} redirected to {}", url, final_url);
                }
                self.cached = Some((url.to_string(), Document::parse(final_url, &body)));
                self.document()
            }
            FetchResult::ContentMismatch { content_type } => {
                tracing::warn!("Failed to load {}: expected HTML, got {}", url, content_type);
                None
            }
            FetchResult::HttpError { status_code } => {
                tracing::warn!("Failed to load {}: HTTP {}", url, status_code);
                None
            }
            FetchResult::NetworkError { error } => {
                tracing::warn!("Failed to load {}: {}", url, error);
                None
            }
        }
    }

    /// The most recently loaded document, if any load succeeded
    pub fn document(&self) -> Option<&Document> {
        self.cached.as_ref().map(|(_, document)| document)
    }

    /// The underlying HTTP client
    pub fn client(&self) -> &Client {
        &self.client
    }
}

/// Downloads `url` into `dest`, reporting progress to `observer`
///
/// The body is streamed to `<dest>.part` and renamed once complete, so an
/// interrupted download never leaves a truncated file under the final name.
///
/// # Returns
///
/// * `Ok(u64)` - Number of bytes written
/// * `Err(MirrorError)` - Request, status, or write failure
pub async fn download_file(
    client: &Client,
    url: &str,
    dest: &Path,
    observer: &dyn ProgressObserver,
) -> Result<u64, MirrorError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| MirrorError::Http {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(MirrorError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    observer.on_start(response.content_length());

    let partial = partial_path(dest);
    let mut file = File::create(&partial)
        .await
        .map_err(|e| StorageError::io(&partial, e))?;

    let written = match stream_to_file(&mut file, response, url, &partial, observer).await {
        Ok(written) => written,
        Err(e) => {
            drop(file);
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(e);
        }
    };
    drop(file);

    tokio::fs::rename(&partial, dest)
        .await
        .map_err(|e| StorageError::io(dest, e))?;

    observer.on_finish(written);
    Ok(written)
}

/// Streams response body to file, returning bytes written
async fn stream_to_file(
    file: &mut File,
    mut response: Response,
    url: &str,
    file_path: &Path,
    observer: &dyn ProgressObserver,
) -> Result<u64, MirrorError> {
    let mut writer = BufWriter::new(file);
    let mut bytes_written: u64 = 0;

    while let Some(chunk) = response.chunk().await.map_err(|source| MirrorError::Http {
        url: url.to_string(),
        source,
    })? {
        writer
            .write_all(&chunk)
            .await
            .map_err(|e| StorageError::io(file_path, e))?;

        bytes_written += chunk.len() as u64;
        observer.on_bytes(chunk.len() as u64);
    }

    writer
        .flush()
        .await
        .map_err(|e| StorageError::io(file_path, e))?;

    Ok(bytes_written)
}

fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    dest.with_file_name(name)
}
