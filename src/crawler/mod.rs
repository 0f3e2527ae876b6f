//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - The [`Fetcher`] abstraction with HTTP, rate-limited and mock versions
//! - HTML parsing and link extraction
//! - Outstanding-work tracking
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod mock;
mod parser;
mod rate_limit;
mod tracker;

pub use coordinator::{crawl, Crawler, DEFAULT_OUTPUT_CAPACITY, DEFAULT_QUEUE_CAPACITY};
pub use fetcher::{build_http_client, Credentials, Fetcher, HttpFetcher};
pub use mock::MockFetcher;
pub use parser::{HtmlPageParser, PageParser, ParsedPage};
pub use rate_limit::{RateLimitedFetcher, Stopper, MAX_DELAY, MIN_DELAY};
pub use tracker::{WorkGuard, WorkTracker};

use crate::config::{seed_url, validate, Config};
use crate::follower::{DisallowFollower, Policy, Unanimous, UnseenFollower};
use crate::model::Page;
use crate::robots::{self, RobotsDirectives};
use crate::GergleError;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use url::Url;

/// A running crawl built from a [`Config`]
///
/// This is the main entry point for crawling a real site. Starting a session
/// will:
/// 1. Validate the configuration and seed URL
/// 2. Build the HTTP client
/// 3. Consult robots.txt (unless ignored)
/// 4. Assemble the follower chain and fetcher
/// 5. Start the crawler
pub struct CrawlSession {
    seed: Url,
    delay: Option<Duration>,
    pages: mpsc::Receiver<Page>,
    stopper: Option<Arc<dyn Stopper + Send + Sync>>,
}

impl CrawlSession {
    /// Starts crawling according to `config`
    ///
    /// # Arguments
    ///
    /// * `config` - The complete configuration, including the seed URL
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlSession)` - The crawl is running
    /// * `Err(GergleError)` - Invalid configuration or HTTP client failure
    pub async fn start(config: &Config) -> Result<Self, GergleError> {
        validate(config)?;
        let seed = seed_url(config)?;
        let client = build_http_client(&config.crawler)?;

        let directives = if config.robots.ignore {
            tracing::info!("Ignoring robots.txt");
            RobotsDirectives::default()
        } else {
            robots::load_directives(&client, &seed).await
        };

        let rules = config
            .crawler
            .disallow
            .iter()
            .chain(directives.disallow.iter());

        let follower = Unanimous::new(vec![
            Policy::Local,
            Policy::Shallow {
                max_depth: config.crawler.max_depth,
            },
            Policy::Disallow(DisallowFollower::new(rules)),
            Policy::Unseen(UnseenFollower::new([seed.clone()])),
        ]);

        let credentials = config.auth.as_ref().map(|auth| Credentials {
            username: auth.username.clone(),
            password: auth.password.clone(),
        });
        let fetcher = HttpFetcher::new(client).with_credentials(credentials);

        let delay = config
            .crawler
            .delay
            .or(directives.crawl_delay)
            .and_then(request_delay);

        let (crawler, stopper) = match delay {
            Some(delay) => {
                tracing::info!("Rate limiting requests to one every {:?}", delay);
                let limited = Arc::new(RateLimitedFetcher::new(delay, fetcher));
                let stopper: Arc<dyn Stopper + Send + Sync> = limited.clone();
                (Crawler::new(limited, follower), Some(stopper))
            }
            None => (Crawler::new(fetcher, follower), None),
        };

        let pages = crawler
            .with_queue_capacity(config.crawler.queue_capacity)
            .with_max_concurrency(config.crawler.workers)
            .crawl(seed.clone());

        Ok(Self {
            seed,
            delay,
            pages,
            stopper,
        })
    }

    /// The URL the crawl started from
    pub fn seed(&self) -> &Url {
        &self.seed
    }

    /// The delay between requests, if rate limited
    pub fn delay(&self) -> Option<Duration> {
        self.delay
    }

    /// Waits for the next page; `None` once the crawl is complete
    pub async fn next_page(&mut self) -> Option<Page> {
        self.pages.recv().await
    }

    /// Releases the rate limiter and stops following new links
    pub fn finish(self) {
        if let Some(stopper) = &self.stopper {
            stopper.stop();
        }
    }
}

/// Converts a delay in seconds into the spacing the rate limiter will use
///
/// Zero, negative and NaN delays disable rate limiting. Anything else is
/// clamped to [`MIN_DELAY`]..=[`MAX_DELAY`], since robots.txt values are
/// untrusted.
fn request_delay(secs: f64) -> Option<Duration> {
    if secs.is_nan() || secs <= 0.0 {
        return None;
    }
    let delay = Duration::try_from_secs_f64(secs).unwrap_or(MAX_DELAY);
    Some(delay.clamp(MIN_DELAY, MAX_DELAY))
}
