use url::Url;

/// Reduces a URL string to the key used for "have we seen this" checks
///
/// The fragment is removed, then every trailing `/`. This deliberately
/// conflates `/docs`, `/docs/` and `/docs#intro`: they are treated as one
/// node of the crawl graph.
///
/// # Examples
///
/// ```
/// use gergle::url::canonicalize;
///
/// assert_eq!(canonicalize("https://example.com/seen/"), "https://example.com/seen");
/// assert_eq!(canonicalize("https://example.com/seen#frag"), "https://example.com/seen");
/// ```
pub fn canonicalize(url: &str) -> String {
    let without_fragment = match url.find('#') {
        Some(index) => &url[..index],
        None => url,
    };

    without_fragment.trim_end_matches('/').to_string()
}

/// Canonical key of a parsed URL
pub fn canonical_key(url: &Url) -> String {
    canonicalize(url.as_str())
}
