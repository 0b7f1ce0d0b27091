use crate::{UrlError, UrlResult};
use url::Url;

/// Derives the on-disk directory name for a listing from its detail URL
///
/// Both URLs are parsed first, so host case, default ports, and dot segments
/// never decide whether a detail URL lies below the base. The base path is
/// stripped from the front, query and fragment are dropped, and any separator
/// left inside the path is replaced by `-` so the slug is always a single
/// path component.
///
/// # Examples
///
/// ```
/// use ebook_mirror::url::listing_slug;
///
/// let slug = listing_slug(
///     "http://Books.Example.com:80",
///     "http://books.example.com/good-habits-for-great-coding/",
/// )
/// .unwrap();
/// assert_eq!(slug, "good-habits-for-great-coding");
/// ```
pub fn listing_slug(base_url: &str, detail_url: &str) -> UrlResult<String> {
    let base = Url::parse(base_url).map_err(|_| UrlError::Malformed(base_url.to_string()))?;
    let detail =
        Url::parse(detail_url).map_err(|_| UrlError::Malformed(detail_url.to_string()))?;

    let outside_base = || UrlError::OutsideBase {
        url: detail_url.to_string(),
        base: base.to_string(),
    };

    if base.origin() != detail.origin() {
        return Err(outside_base());
    }

    // A base of "/catalog" must not claim "/catalogue/..."
    let rest = detail
        .path()
        .strip_prefix(base.path().trim_end_matches('/'))
        .filter(|rest| rest.is_empty() || rest.starts_with('/'))
        .ok_or_else(outside_base)?;

    let slug = rest
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("-")
        .replace('\\', "-");

    if slug.is_empty() || slug == "." || slug == ".." {
        return Err(UrlError::EmptySlug(detail_url.to_string()));
    }

    Ok(slug)
}
