/// Checks if a host matches an asset-host pattern
///
/// Two kinds of pattern are supported:
/// 1. Exact: "file.example.com" matches only "file.example.com"
/// 2. Wildcard: "*.example.com" matches "example.com" itself and any
///    subdomain below it, however deep
///
/// Matching is case-sensitive; hosts should be lowercased first.
///
/// # Examples
///
/// ```
/// use ebook_mirror::url::matches_wildcard;
///
/// assert!(matches_wildcard("file.example.com", "file.example.com"));
/// assert!(!matches_wildcard("file.example.com", "www.example.com"));
///
/// assert!(matches_wildcard("*.example.com", "example.com"));
/// assert!(matches_wildcard("*.example.com", "dl.eu.example.com"));
/// assert!(!matches_wildcard("*.example.com", "example.org"));
/// ```
pub fn matches_wildcard(pattern: &str, candidate: &str) -> bool {
    match pattern.strip_prefix("*.") {
        Some(base) => {
            candidate == base
                || candidate
                    .strip_suffix(base)
                    .is_some_and(|prefix| prefix.ends_with('.'))
        }
        None => candidate == pattern,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert!(matches_wildcard("file.example.com", "file.example.com"));
        assert!(matches_wildcard("127.0.0.1", "127.0.0.1"));
    }

    #[test]
    fn test_exact_no_match() {
        assert!(!matches_wildcard("file.example.com", "example.com"));
        assert!(!matches_wildcard("file.example.com", "dl.file.example.com"));
    }

    #[test]
    fn test_wildcard_matches_bare_and_nested() {
        assert!(matches_wildcard("*.example.com", "example.com"));
        assert!(matches_wildcard("*.example.com", "file.example.com"));
        assert!(matches_wildcard("*.example.com", "a.b.example.com"));
    }

    #[test]
    fn test_wildcard_rejects_lookalikes() {
        assert!(!matches_wildcard("*.example.com", "myexample.com"));
        assert!(!matches_wildcard("*.example.com", "example.com.evil.net"));
        assert!(!matches_wildcard("*.example.com", ""));
    }

    #[test]
    fn test_case_sensitivity() {
        assert!(!matches_wildcard("file.example.com", "FILE.example.com"));
    }
}
