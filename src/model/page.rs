use crate::model::{Link, Task};
use crate::FetchError;
use url::Url;

/// The outcome of attempting one [`Task`]
///
/// A page is either processed (no error, links and assets as found) or failed
/// (an error, no links, no assets). The two constructors are the only way to
/// build one, so a failed fetch can never carry links into the crawl.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    url: Url,
    processed: bool,
    depth: u32,
    links: Vec<Link>,
    assets: Vec<Link>,
    error: Option<FetchError>,
}

impl Page {
    /// Creates a successfully processed page
    pub fn processed(url: Url, depth: u32, links: Vec<Link>, assets: Vec<Link>) -> Self {
        Self {
            url,
            processed: true,
            depth,
            links,
            assets,
            error: None,
        }
    }

    /// Creates a page recording why its task failed
    pub fn failed(url: Url, depth: u32, error: FetchError) -> Self {
        Self {
            url,
            processed: false,
            depth,
            links: Vec::new(),
            assets: Vec::new(),
            error: Some(error),
        }
    }

    /// Creates the failed page for a task
    pub fn failed_task(task: &Task, error: FetchError) -> Self {
        Self::failed(task.url.clone(), task.depth, error)
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn is_processed(&self) -> bool {
        self.processed
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Outbound anchor links, in document order
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Asset links, in document order
    pub fn assets(&self) -> &[Link] {
        &self.assets
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }
}
