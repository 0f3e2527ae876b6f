/// Links discovered on crawled pages
///
/// A link is either an anchor (a candidate for further crawling) or an asset
/// the page depends on (observed and reported, never crawled).
use std::fmt;
use url::Url;

/// The kind of resource an asset link points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// `<img src>`
    Image,
    /// `<script src>`
    Script,
    /// `<link rel="stylesheet" href>`
    Stylesheet,
    /// `<iframe src>` and `<frame src>`
    Frame,
    /// `<video>`, `<audio>` and `<source>` sources
    Media,
    /// `<object data>` and `<embed src>`
    Object,
}

impl AssetKind {
    /// Returns the short tag used in output listings
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Script => "script",
            Self::Stylesheet => "stylesheet",
            Self::Frame => "frame",
            Self::Media => "media",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a link is navigational or a page dependency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    Anchor,
    Asset(AssetKind),
}

impl LinkKind {
    /// Returns the type tag printed in long output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Anchor => "anchor",
            Self::Asset(kind) => kind.as_str(),
        }
    }
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reference from one page to another resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub kind: LinkKind,
    /// Absolute URL, resolved against the referring page's base
    pub url: Url,
    /// True when scheme or host differs from the referring page's base
    pub external: bool,
    /// Depth the linked resource would be crawled at
    pub depth: u32,
}

impl Link {
    /// Creates an anchor link from an `<a href>` value
    ///
    /// # Arguments
    ///
    /// * `href` - The raw attribute value, absolute or relative
    /// * `base` - The effective base URL of the referring page
    /// * `depth` - Depth of the linked page (referring depth + 1)
    ///
    /// # Returns
    ///
    /// * `Ok(Link)` - The resolved link
    /// * `Err(url::ParseError)` - The href could not be resolved
    pub fn anchor(href: &str, base: &Url, depth: u32) -> Result<Self, url::ParseError> {
        Self::resolve(LinkKind::Anchor, href, base, depth)
    }

    /// Creates an asset link describing a page's dependency on another resource
    pub fn asset(
        kind: AssetKind,
        href: &str,
        base: &Url,
        depth: u32,
    ) -> Result<Self, url::ParseError> {
        Self::resolve(LinkKind::Asset(kind), href, base, depth)
    }

    fn resolve(kind: LinkKind, href: &str, base: &Url, depth: u32) -> Result<Self, url::ParseError> {
        let url = base.join(href.trim())?;
        let external = crate::url::is_external(&url, base);
        Ok(Self {
            kind,
            url,
            external,
            depth,
        })
    }

    /// Returns true for anchor links
    pub fn is_anchor(&self) -> bool {
        matches!(self.kind, LinkKind::Anchor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/docs/index.html").unwrap()
    }

    #[test]
    fn test_relative_anchor_is_internal() {
        let link = Link::anchor("guide.html", &base(), 1).unwrap();
        assert_eq!(link.url.as_str(), "https://example.com/docs/guide.html");
        assert!(!link.external);
        assert_eq!(link.depth, 1);
        assert!(link.is_anchor());
    }

    #[test]
    fn test_other_host_is_external() {
        let link = Link::anchor("https://other.com/", &base(), 1).unwrap();
        assert!(link.external);
    }

    #[test]
    fn test_other_scheme_is_external() {
        let link = Link::anchor("http://example.com/", &base(), 1).unwrap();
        assert!(link.external);

        let link = Link::anchor("mailto:someone@example.com", &base(), 1).unwrap();
        assert!(link.external);
    }

    #[test]
    fn test_other_port_is_external() {
        let link = Link::anchor("https://example.com:8443/", &base(), 1).unwrap();
        assert!(link.external);
    }

    #[test]
    fn test_malformed_href_fails() {
        assert!(Link::anchor("http://[::1", &base(), 1).is_err());
    }

    #[test]
    fn test_asset_kind_tag() {
        let link = Link::asset(AssetKind::Image, "/logo.png", &base(), 2).unwrap();
        assert_eq!(link.kind.to_string(), "image");
        assert!(!link.is_anchor());
        assert_eq!(LinkKind::Anchor.to_string(), "anchor");
    }
}
