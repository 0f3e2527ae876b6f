//! In-memory fetcher for tests and dry runs

use crate::crawler::fetcher::Fetcher;
use crate::model::{Page, Task};
use crate::FetchError;
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::HashMap;

/// Serves preconfigured pages keyed by their exact URL
///
/// Any other URL yields a failed page with [`FetchError::NotFound`]. Every
/// request is counted per URL, whether or not it was found.
#[derive(Debug, Default)]
pub struct MockFetcher {
    pages: HashMap<String, Page>,
    fetches: DashMap<String, usize>,
}

impl MockFetcher {
    pub fn new(pages: impl IntoIterator<Item = Page>) -> Self {
        let pages = pages
            .into_iter()
            .map(|page| (page.url().as_str().to_string(), page))
            .collect();

        Self {
            pages,
            fetches: DashMap::new(),
        }
    }

    /// Number of times `url` was requested
    pub fn fetch_count(&self, url: &str) -> usize {
        self.fetches.get(url).map(|count| *count).unwrap_or(0)
    }

    /// Number of requests across all URLs
    pub fn total_fetches(&self) -> usize {
        self.fetches.iter().map(|entry| *entry.value()).sum()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, task: &Task) -> Page {
        *self.fetches.entry(task.url.as_str().to_string()).or_insert(0) += 1;

        match self.pages.get(task.url.as_str()) {
            Some(page) => page.clone(),
            None => Page::failed_task(task, FetchError::NotFound),
        }
    }
}
