use serde::Deserialize;

/// Main configuration structure for Gergle
///
/// Every field has a default, so an empty file (or no file at all) is a
/// valid starting point that command-line flags are layered on.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// URL the crawl starts from
    pub seed: Option<String>,
    pub crawler: CrawlerConfig,
    pub robots: RobotsConfig,
    pub auth: Option<AuthConfig>,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum depth to crawl from the seed (inclusive)
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Disallowed path patterns, in addition to robots.txt
    pub disallow: Vec<String>,

    /// Maximum idle connections kept open per host
    pub connections: usize,

    /// Seconds between requests; unset means use robots.txt Crawl-Delay
    pub delay: Option<f64>,

    /// Maximum number of fetches in flight; unset means uncapped
    pub workers: Option<usize>,

    /// Capacity of the pending task queue
    #[serde(rename = "queue-capacity")]
    pub queue_capacity: usize,

    /// Per-request timeout in seconds
    pub timeout: u64,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 100,
            disallow: Vec::new(),
            connections: 5,
            delay: None,
            workers: None,
            queue_capacity: 100,
            timeout: 30,
            user_agent: format!("gergle/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// robots.txt handling
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RobotsConfig {
    /// Skip fetching robots.txt entirely
    pub ignore: bool,
}

/// HTTP Basic credentials sent with every page request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    pub username: String,
    #[serde(default)]
    pub password: Option<String>,
}

/// How page records are written
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// List every link and asset under each page
    pub long: bool,

    pub format: OutputFormat,
}

/// Record format on stdout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
