//! Data exchanged between the crawler components
//!
//! - [`Task`]: a URL waiting to be fetched at a known depth
//! - [`Link`]: a reference discovered on a page
//! - [`Page`]: the outcome of one task, success or failure

mod link;
mod page;

pub use link::{AssetKind, Link, LinkKind};
pub use page::Page;

use url::Url;

/// A pending unit of crawl work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub url: Url,
    pub depth: u32,
}

impl Task {
    pub fn new(url: Url, depth: u32) -> Self {
        Self { url, depth }
    }

    /// The task every crawl starts from
    pub fn seed(url: Url) -> Self {
        Self::new(url, 0)
    }
}

impl From<&Link> for Task {
    fn from(link: &Link) -> Self {
        Self::new(link.url.clone(), link.depth)
    }
}
