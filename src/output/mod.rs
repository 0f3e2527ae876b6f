//! Output module for rendering crawled pages
//!
//! This module handles:
//! - Converting pages into [`PageRecord`]s
//! - Rendering records as text (short or long form) or JSON lines
//! - Accumulating crawl statistics in [`CrawlSummary`]

pub mod stats;

pub use stats::CrawlSummary;

use crate::config::{OutputConfig, OutputFormat};
use crate::model::{Link, Page};
use serde::Serialize;
use std::fmt::Write as _;
use std::io::Write;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to format output: {0}")]
    Format(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// One link in a long listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkRecord {
    /// `anchor` or the asset kind
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub url: String,
}

impl From<&Link> for LinkRecord {
    fn from(link: &Link) -> Self {
        Self {
            kind: link.kind.as_str(),
            url: link.url.to_string(),
        }
    }
}

/// What gets reported about one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRecord {
    pub url: String,
    pub depth: u32,
    pub links: usize,
    pub assets: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Anchors followed by assets; only serialized in long mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing: Option<Vec<LinkRecord>>,
}

impl From<&Page> for PageRecord {
    fn from(page: &Page) -> Self {
        let listing = page
            .links()
            .iter()
            .chain(page.assets())
            .map(LinkRecord::from)
            .collect();

        Self {
            url: page.url().to_string(),
            depth: page.depth(),
            links: page.links().len(),
            assets: page.assets().len(),
            error: page.error().map(|e| e.to_string()),
            listing: Some(listing),
        }
    }
}

impl PageRecord {
    /// Renders the record as text
    ///
    /// `URL: <url>, Depth: <d>, Links: <n>, Assets: <m>`, with `, Error: <e>`
    /// appended for failed pages. Long form adds one indented
    /// `<type> <url>` line per link and asset.
    pub fn to_text(&self, long: bool) -> String {
        let mut out = format!(
            "URL: {}, Depth: {}, Links: {}, Assets: {}",
            self.url, self.depth, self.links, self.assets
        );
        if let Some(error) = &self.error {
            let _ = write!(out, ", Error: {}", error);
        }

        if long {
            for link in self.listing.iter().flatten() {
                let _ = write!(out, "\n  {} {}", link.kind, link.url);
            }
        }
        out
    }

    /// Renders the record as a single JSON line
    pub fn to_json(&self, long: bool) -> OutputResult<String> {
        if long {
            return Ok(serde_json::to_string(self)?);
        }

        let short = Self {
            listing: None,
            ..self.clone()
        };
        Ok(serde_json::to_string(&short)?)
    }
}

/// Writes one page to `out` in the configured format
pub fn write_page<W: Write>(out: &mut W, page: &Page, config: &OutputConfig) -> OutputResult<()> {
    let record = PageRecord::from(page);
    let line = match config.format {
        OutputFormat::Text => record.to_text(config.long),
        OutputFormat::Json => record.to_json(config.long)?,
    };
    writeln!(out, "{}", line)?;
    Ok(())
}
