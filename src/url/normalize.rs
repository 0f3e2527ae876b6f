use crate::UrlError;
use url::Url;

/// Parses and validates the URL a crawl starts from
///
/// # Validation Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Only `http` and `https` schemes are crawlable
/// 3. The URL must carry a host
///
/// # Arguments
///
/// * `url_str` - The URL string given on the command line or in config
///
/// # Returns
///
/// * `Ok(Url)` - The seed URL, unchanged apart from parsing
/// * `Err(UrlError)` - The URL cannot seed a crawl
///
/// # Examples
///
/// ```
/// use gergle::url::parse_seed_url;
///
/// let url = parse_seed_url("https://example.com/docs/").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/docs/");
/// assert!(parse_seed_url("ftp://example.com/").is_err());
/// ```
pub fn parse_seed_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Expected URL of the form http[s]://..., got scheme: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    Ok(url)
}
