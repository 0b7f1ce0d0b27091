use url::Url;

/// Derives a download's file name from the last `/`-delimited path segment
///
/// Returns `None` when the path ends in a separator or the segment would not
/// be a usable file name (`.` or `..`). Percent-escapes are kept as they
/// appear in the URL so the name is stable across runs.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use ebook_mirror::url::file_name_from_url;
///
/// let url = Url::parse("http://file.example.com/2017/05/Clean_Code.pdf").unwrap();
/// assert_eq!(file_name_from_url(&url), Some("Clean_Code.pdf".to_string()));
/// ```
pub fn file_name_from_url(url: &Url) -> Option<String> {
    let segment = url.path_segments()?.last()?;

    if segment.is_empty() || segment == "." || segment == ".." {
        return None;
    }

    Some(segment.replace('\\', "_"))
}
