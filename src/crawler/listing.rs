//! Catalog page extraction
//!
//! Overview pages carry a pagination control and a list of entry headings;
//! detail pages carry a download-links container and the article text.
//!
//! ```html
//! <!-- overview -->
//! <h2 class="entry-title"><a href="http://site/some-book/">Some Book</a></h2>
//! <div class="pagination"><span class="current">1</span><a href="http://site/page/2/">2</a></div>
//!
//! <!-- detail -->
//! <article class="post"><div class="entry-content">About the book...</div></article>
//! <span class="download-links"><a href="http://file.site/2017/some-book.pdf">PDF</a></span>
//! ```

use crate::config::SiteConfig;
use crate::crawler::fetcher::Document;
use crate::crawler::fields::{element_text, FieldExtractor};
use crate::url::{file_name_from_url, is_asset_url};
use scraper::{ElementRef, Selector};

/// A downloadable asset found on a detail page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    /// Absolute download URL
    pub url: String,
    /// File name, the last path segment of `url`
    pub name: String,
}

/// Everything extracted from one detail page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingRecord {
    /// Article text of the listing
    pub description: String,
    /// Recognized downloads, possibly empty
    pub files: Vec<FileDescriptor>,
}

const CURRENT_PAGE: &str = "span.current";
const ENTRY_TITLE: &str = "h2.entry-title";
const ANCHOR: &str = "a[href]";
const DOWNLOAD_LINKS: &str = "span.download-links";
const ARTICLE: &str = "article.post";
const ARTICLE_BODY: &str = ".entry-content";

/// Site-specific extraction of pagination, listing links, and downloads
#[derive(Debug, Clone)]
pub struct ListingExtractor {
    asset_hosts: Vec<String>,
}

impl ListingExtractor {
    /// Creates an extractor keeping downloads served from `asset_hosts`
    pub fn new(asset_hosts: Vec<String>) -> Self {
        Self {
            asset_hosts: asset_hosts.into_iter().map(|h| h.to_lowercase()).collect(),
        }
    }

    /// Creates an extractor from the site configuration
    pub fn from_config(site: &SiteConfig) -> Self {
        Self::new(site.asset_hosts.clone())
    }

    /// Returns the next overview page URL, or `None` when pagination ends
    ///
    /// The next page is the anchor immediately following the pagination
    /// control's "current page" marker.
    pub fn parse_next_page(&self, page: &impl FieldExtractor) -> Option<String> {
        let document = page.document()?;
        let current_selector = Selector::parse(CURRENT_PAGE).ok()?;
        let current = document.html().select(&current_selector).next()?;

        let next = current.next_siblings().find_map(ElementRef::wrap)?;
        if next.value().name() != "a" {
            return None;
        }

        let href = next.value().attr("href")?;
        document.resolve(href).map(String::from)
    }

    /// Returns the detail page URLs linked from the entry headings
    ///
    /// Each heading contributes its first anchor, whether that anchor is a
    /// direct child or nested deeper. Document order is kept and duplicates
    /// are not removed.
    pub fn parse_detail_pages(&self, page: &impl FieldExtractor) -> Vec<String> {
        let Some(document) = page.document() else {
            return Vec::new();
        };
        let (Ok(heading_selector), Ok(anchor_selector)) =
            (Selector::parse(ENTRY_TITLE), Selector::parse(ANCHOR))
        else {
            return Vec::new();
        };

        document
            .html()
            .select(&heading_selector)
            .filter_map(|heading| heading.select(&anchor_selector).next())
            .filter_map(|anchor| anchor.value().attr("href"))
            .filter_map(|href| document.resolve(href))
            .map(String::from)
            .collect()
    }

    /// Extracts the description and downloadable files of a detail page
    ///
    /// Links in the download container that do not point at an asset host,
    /// or whose URL has no file name, are dropped. A page without any
    /// recognized download yields an empty file list, never an error.
    pub fn parse_detail_page(&self, page: &impl FieldExtractor) -> ListingRecord {
        let Some(document) = page.document() else {
            return ListingRecord::default();
        };

        ListingRecord {
            description: self.parse_description(document),
            files: self.parse_files(document),
        }
    }

    fn parse_files(&self, document: &Document) -> Vec<FileDescriptor> {
        let mut files: Vec<FileDescriptor> = Vec::new();
        let Ok(container_selector) = Selector::parse(DOWNLOAD_LINKS) else {
            return files;
        };

        let hrefs = document
            .html()
            .select(&container_selector)
            .flat_map(|container| container.children().filter_map(ElementRef::wrap))
            .filter(|child| child.value().name() == "a")
            .filter_map(|anchor| anchor.value().attr("href"));

        for href in hrefs {
            let Some(url) = document.resolve(href) else {
                continue;
            };

            if !is_asset_url(&url, &self.asset_hosts) {
                tracing::debug!("Ignoring non-asset link {} on {}", url, document.url());
                continue;
            }

            let Some(name) = file_name_from_url(&url) else {
                tracing::debug!("Ignoring link without file name {}", url);
                continue;
            };

            if files.iter().any(|f| f.name == name) {
                continue;
            }

            files.push(FileDescriptor {
                url: url.to_string(),
                name,
            });
        }

        files
    }

    fn parse_description(&self, document: &Document) -> String {
        let (Ok(article_selector), Ok(body_selector)) =
            (Selector::parse(ARTICLE), Selector::parse(ARTICLE_BODY))
        else {
            return String::new();
        };
        let Some(article) = document.html().select(&article_selector).next() else {
            return String::new();
        };

        let body = article.select(&body_selector).next().unwrap_or(article);

        element_text(&body).trim().to_string()
    }
}
