//! URL handling module for Gergle
//!
//! This module provides seed URL validation, canonicalization for
//! deduplication, and the same-site test used to mark links external.

mod canonical;
mod normalize;

use url::Url;

// Re-export main functions
pub use canonical::{canonical_key, canonicalize};
pub use normalize::parse_seed_url;

/// Returns true when `url` leaves the site `base` belongs to
///
/// A URL is external when its scheme or its host (including port) differs
/// from the base. Subdomains count as different sites.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use gergle::url::is_external;
///
/// let base = Url::parse("https://example.com/").unwrap();
/// assert!(!is_external(&Url::parse("https://example.com/a").unwrap(), &base));
/// assert!(is_external(&Url::parse("https://blog.example.com/").unwrap(), &base));
/// assert!(is_external(&Url::parse("http://example.com/").unwrap(), &base));
/// ```
pub fn is_external(url: &Url, base: &Url) -> bool {
    url.scheme() != base.scheme()
        || url.host_str() != base.host_str()
        || url.port_or_known_default() != base.port_or_known_default()
}

/// Resolves `/robots.txt` for the site a URL belongs to
pub fn robots_url(url: &Url) -> Result<Url, url::ParseError> {
    url.join("/robots.txt")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_site_not_external() {
        let base = Url::parse("https://example.com/docs/").unwrap();
        let url = Url::parse("https://example.com/blog?page=2").unwrap();
        assert!(!is_external(&url, &base));
    }

    #[test]
    fn test_explicit_default_port_is_same_site() {
        let base = Url::parse("https://example.com/").unwrap();
        let url = Url::parse("https://example.com:443/a").unwrap();
        assert!(!is_external(&url, &base));
    }

    #[test]
    fn test_subdomain_is_external() {
        let base = Url::parse("https://example.com/").unwrap();
        let url = Url::parse("https://www.example.com/").unwrap();
        assert!(is_external(&url, &base));
    }

    #[test]
    fn test_robots_url() {
        let url = Url::parse("https://example.com/deep/page.html?x=1").unwrap();
        assert_eq!(
            robots_url(&url).unwrap().as_str(),
            "https://example.com/robots.txt"
        );
    }
}
