//! Gergle: a polite, concurrent website crawler
//!
//! This crate crawls a single site from a seed URL, following same-site links
//! under a chain of follow policies, and streams one [`Page`] per fetched (or
//! failed) URL until no work remains.

pub mod config;
pub mod crawler;
pub mod follower;
pub mod model;
pub mod output;
pub mod robots;
pub mod url;

use thiserror::Error;

/// Main error type for Gergle operations
///
/// Page-level failures never surface here; they are carried as data in
/// [`Page::error`]. These are the failures that stop a crawl from starting.
#[derive(Debug, Error)]
pub enum GergleError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Robots.txt error: {0}")]
    Robots(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Why a single page could not be fetched or read
///
/// Stored inside a failed [`Page`]; its `Display` text is what consumers see.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("non-success status {0}")]
    Status(u16),

    #[error("content type {0:?} is not text")]
    ContentType(String),

    #[error("failed to read body: {0}")]
    Body(String),

    #[error("page not found")]
    NotFound,

    #[error("rate limiter stopped")]
    LimiterStopped,
}

/// Result type alias for Gergle operations
pub type Result<T> = std::result::Result<T, GergleError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, Crawler, Fetcher};
pub use follower::{Denial, Follower, Policy, Unanimous};
pub use model::{AssetKind, Link, LinkKind, Page, Task};
pub use crate::url::{canonicalize, parse_seed_url};
