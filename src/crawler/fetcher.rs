//! HTTP fetcher implementation
//!
//! This module defines the [`Fetcher`] abstraction the crawler talks to and
//! its production implementation:
//! - Building a pooled HTTP client from the crawler configuration
//! - GET requests with optional basic auth
//! - Status and Content-Type checks
//! - Handing the body to a [`PageParser`]

use crate::config::CrawlerConfig;
use crate::crawler::parser::{HtmlPageParser, PageParser};
use crate::model::{Page, Task};
use crate::FetchError;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// Produces a [`Page`] for a [`Task`]
///
/// Implementations never fail outright: any problem is reported as a failed
/// page via [`Page::failed`].
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, task: &Task) -> Page;
}

#[async_trait]
impl<F: Fetcher + ?Sized> Fetcher for Arc<F> {
    async fn fetch(&self, task: &Task) -> Page {
        (**self).fetch(task).await
    }
}

#[async_trait]
impl<F: Fetcher + ?Sized> Fetcher for Box<F> {
    async fn fetch(&self, task: &Task) -> Page {
        (**self).fetch(task).await
    }
}

/// Builds an HTTP client with proper configuration
///
/// The client keeps up to `connections` idle connections per host, so
/// repeated requests to the crawled site reuse them.
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use gergle::config::CrawlerConfig;
/// use gergle::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout))
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(config.connections)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Basic-auth credentials sent with every request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: Option<String>,
}

/// Fetches pages over HTTP and parses them
pub struct HttpFetcher {
    client: Client,
    parser: Arc<dyn PageParser>,
    credentials: Option<Credentials>,
}

impl HttpFetcher {
    /// Creates a fetcher using the default HTML parser
    pub fn new(client: Client) -> Self {
        Self {
            client,
            parser: Arc::new(HtmlPageParser),
            credentials: None,
        }
    }

    /// Replaces the parser used on successful responses
    pub fn with_parser(mut self, parser: Arc<dyn PageParser>) -> Self {
        self.parser = parser;
        self
    }

    /// Sends basic-auth credentials with every request
    pub fn with_credentials(mut self, credentials: Option<Credentials>) -> Self {
        self.credentials = credentials;
        self
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, task: &Task) -> Page {
        let mut request = self.client.get(task.url.clone());
        if let Some(credentials) = &self.credentials {
            request = request.basic_auth(&credentials.username, credentials.password.as_ref());
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return Page::failed_task(task, FetchError::Transport(describe(&e))),
        };

        let status = response.status();
        if !status.is_success() {
            return Page::failed_task(task, FetchError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !is_text_content(&content_type) {
            return Page::failed_task(task, FetchError::ContentType(content_type));
        }

        let final_url = response.url().clone();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return Page::failed_task(task, FetchError::Body(e.to_string())),
        };

        let parsed = self.parser.parse(&final_url, &body, task.depth + 1);
        Page::processed(task.url.clone(), task.depth, parsed.links, parsed.assets)
    }
}

/// Returns true when a Content-Type names a document worth parsing
fn is_text_content(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    let top_level = essence.split('/').next().unwrap_or("");

    top_level == "text" || essence.contains("html")
}

fn describe(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "request timeout".to_string()
    } else if error.is_connect() {
        format!("connection failed: {}", error)
    } else {
        error.to_string()
    }
}
