//! Configuration module for Gergle
//!
//! Settings come from an optional TOML file, with command-line flags layered
//! on top. Everything is validated before any request is made.
//!
//! # Example
//!
//! ```no_run
//! use gergle::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("gergle.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{AuthConfig, Config, CrawlerConfig, OutputConfig, OutputFormat, RobotsConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{seed_url, validate};
