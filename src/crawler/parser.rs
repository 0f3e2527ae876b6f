//! HTML parser for extracting links and assets
//!
//! The crawler only depends on the [`PageParser`] contract. The default
//! [`HtmlPageParser`] finds:
//! - The effective base URL (`<base href>` if present)
//! - Anchor links from `<a href>` tags, in document order
//! - Asset links from images, scripts, stylesheets, frames, media and objects

use crate::model::{AssetKind, Link};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use url::Url;

/// Links extracted from one response body
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// URL relative links were resolved against
    pub base: Url,

    /// Anchor links, in document order
    pub links: Vec<Link>,

    /// Asset links, in document order
    pub assets: Vec<Link>,
}

/// Turns a fetched body into links
///
/// Parsing never fails as a whole: a link that cannot be resolved is skipped.
pub trait PageParser: Send + Sync {
    /// # Arguments
    ///
    /// * `response_url` - The URL the body was served from (after redirects)
    /// * `body` - The response body
    /// * `depth` - Depth to assign to every discovered link
    fn parse(&self, response_url: &Url, body: &str, depth: u32) -> ParsedPage;
}

static BASE: Lazy<Selector> = Lazy::new(|| selector("base[href]"));
static ANCHORS: Lazy<Selector> = Lazy::new(|| selector("a[href]"));

/// Attribute carrying the URL, per asset selector
static ASSETS: Lazy<Vec<(Selector, &'static str, AssetKind)>> = Lazy::new(|| {
    vec![
        (selector("img[src]"), "src", AssetKind::Image),
        (selector("script[src]"), "src", AssetKind::Script),
        (
            selector("link[rel~='stylesheet'][href]"),
            "href",
            AssetKind::Stylesheet,
        ),
        (selector("iframe[src], frame[src]"), "src", AssetKind::Frame),
        (
            selector("video[src], audio[src], source[src]"),
            "src",
            AssetKind::Media,
        ),
        (selector("object[data]"), "data", AssetKind::Object),
        (selector("embed[src]"), "src", AssetKind::Object),
    ]
});

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

/// [`PageParser`] backed by the `scraper` HTML parser
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlPageParser;

impl PageParser for HtmlPageParser {
    fn parse(&self, response_url: &Url, body: &str, depth: u32) -> ParsedPage {
        let document = Html::parse_document(body);
        let base = effective_base(&document, response_url);
        let links = extract_links(&document, &base, depth);
        let assets = extract_assets(&document, &base, depth);

        ParsedPage {
            base,
            links,
            assets,
        }
    }
}

/// Returns the URL relative links resolve against
fn effective_base(document: &Html, response_url: &Url) -> Url {
    document
        .select(&BASE)
        .next()
        .and_then(|element| element.value().attr("href"))
        .and_then(|href| match response_url.join(href.trim()) {
            Ok(base) => Some(base),
            Err(e) => {
                tracing::debug!("Ignoring unparseable <base href={:?}>: {}", href, e);
                None
            }
        })
        .unwrap_or_else(|| response_url.clone())
}

fn extract_links(document: &Html, base: &Url, depth: u32) -> Vec<Link> {
    document
        .select(&ANCHORS)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| match Link::anchor(href, base, depth) {
            Ok(link) => Some(link),
            Err(e) => {
                tracing::debug!("Failed to parse href {:?}: {}", href, e);
                None
            }
        })
        .collect()
}

fn extract_assets(document: &Html, base: &Url, depth: u32) -> Vec<Link> {
    // Walk the tree once so assets come out in document order.
    let mut assets = Vec::new();
    for element in document.root_element().descendants().filter_map(scraper::ElementRef::wrap) {
        let Some((attr, kind)) = ASSETS
            .iter()
            .find(|(selector, _, _)| selector.matches(&element))
            .map(|(_, attr, kind)| (*attr, *kind))
        else {
            continue;
        };

        let Some(src) = element.value().attr(attr) else {
            continue;
        };

        match Link::asset(kind, src, base, depth) {
            Ok(link) => assets.push(link),
            Err(e) => tracing::debug!("Failed to parse asset source {:?}: {}", src, e),
        }
    }
    assets
}
