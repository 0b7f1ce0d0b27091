//! URL handling module for Ebook-Mirror
//!
//! This module turns catalog URLs into the names used on disk (listing slugs
//! and downloaded file names) and decides which download links point at the
//! site's asset hosts.

mod file_name;
mod matcher;
mod slug;

// Re-export main functions
pub use file_name::file_name_from_url;
pub use matcher::matches_wildcard;
pub use slug::listing_slug;

use url::Url;

/// Checks whether a download URL is served from one of the asset hosts
///
/// The host is lowercased before matching; patterns are expected in lowercase
/// and may use the `*.example.com` wildcard form.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use ebook_mirror::url::is_asset_url;
///
/// let hosts = vec!["file.example.com".to_string()];
/// let url = Url::parse("http://File.Example.com/2017/book.pdf").unwrap();
/// assert!(is_asset_url(&url, &hosts));
///
/// let url = Url::parse("http://ads.example.net/banner.pdf").unwrap();
/// assert!(!is_asset_url(&url, &hosts));
/// ```
pub fn is_asset_url(url: &Url, asset_hosts: &[String]) -> bool {
    let Some(host) = url.host_str().map(|h| h.to_lowercase()) else {
        return false;
    };

    asset_hosts
        .iter()
        .any(|pattern| matches_wildcard(pattern, &host))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hosts() -> Vec<String> {
        vec!["file.example.com".to_string(), "*.cdn.example.org".to_string()]
    }

    #[test]
    fn test_exact_asset_host() {
        let url = Url::parse("http://file.example.com/a/b.pdf").unwrap();
        assert!(is_asset_url(&url, &hosts()));
    }

    #[test]
    fn test_wildcard_asset_host() {
        let url = Url::parse("https://eu.cdn.example.org/b.epub").unwrap();
        assert!(is_asset_url(&url, &hosts()));

        let url = Url::parse("https://cdn.example.org/b.epub").unwrap();
        assert!(is_asset_url(&url, &hosts()));
    }

    #[test]
    fn test_unrelated_host_rejected() {
        let url = Url::parse("http://www.example.com/b.pdf").unwrap();
        assert!(!is_asset_url(&url, &hosts()));
    }

    #[test]
    fn test_host_matching_ignores_port() {
        let url = Url::parse("http://file.example.com:8080/b.pdf").unwrap();
        assert!(is_asset_url(&url, &hosts()));
    }

    #[test]
    fn test_uppercase_host_is_lowercased() {
        let url = Url::parse("http://FILE.EXAMPLE.COM/b.pdf").unwrap();
        assert!(is_asset_url(&url, &hosts()));
    }

    #[test]
    fn test_url_without_host() {
        let url = Url::parse("mailto:someone@file.example.com").unwrap();
        assert!(!is_asset_url(&url, &hosts()));
    }
}
