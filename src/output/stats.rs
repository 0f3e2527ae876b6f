//! Crawl statistics
//!
//! Counts are accumulated page by page as the crawl streams its results and
//! logged once the crawl has finished.

use crate::model::Page;
use serde::Serialize;
use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CrawlSummary {
    /// Total number of pages emitted
    pub pages: u64,

    /// Pages fetched and parsed successfully
    pub processed: u64,

    /// Pages whose fetch failed
    pub failed: u64,

    /// Anchor links found across all pages
    pub links: u64,

    /// Asset links found across all pages
    pub assets: u64,
}

impl CrawlSummary {
    /// Adds one page to the totals
    pub fn record(&mut self, page: &Page) {
        self.pages += 1;
        if page.is_processed() {
            self.processed += 1;
        } else {
            self.failed += 1;
        }
        self.links += page.links().len() as u64;
        self.assets += page.assets().len() as u64;
    }

    /// Percentage of pages processed successfully
    pub fn success_rate(&self) -> f64 {
        if self.pages > 0 {
            (self.processed as f64 / self.pages as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Logs the summary at info level
    pub fn log(&self, elapsed: Duration) {
        tracing::info!(
            pages = self.pages,
            processed = self.processed,
            failed = self.failed,
            links = self.links,
            assets = self.assets,
            "Crawled {} pages in {:.2?} ({:.1}% processed)",
            self.pages,
            elapsed,
            self.success_rate()
        );
    }
}
