//! Robots.txt handling module
//!
//! This module fetches robots.txt for the seed's site and extracts the
//! directives the crawler honours. A missing or unreachable robots.txt never
//! stops a crawl; the caller logs it and carries on unrestricted.

mod parser;

pub use parser::RobotsDirectives;

use crate::GergleError;
use reqwest::{Client, StatusCode};
use url::Url;

/// Fetches the body of robots.txt for the site `seed` belongs to
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `seed` - Any URL on the target site
///
/// # Returns
///
/// * `Ok(String)` - The robots.txt body
/// * `Err(GergleError)` - Transport failure or a non-200 response
pub async fn fetch_robots(client: &Client, seed: &Url) -> Result<String, GergleError> {
    let robots_url = crate::url::robots_url(seed)
        .map_err(|e| GergleError::Robots(format!("cannot resolve robots.txt: {}", e)))?;
    tracing::info!("Fetching robots.txt from {}", robots_url);

    let response = client.get(robots_url).send().await?;
    if response.status() != StatusCode::OK {
        return Err(GergleError::Robots(format!(
            "robots.txt not found ({})",
            response.status().as_u16()
        )));
    }

    Ok(response.text().await?)
}

/// Fetches and parses robots.txt, treating any failure as "no directives"
pub async fn load_directives(client: &Client, seed: &Url) -> RobotsDirectives {
    match fetch_robots(client, seed).await {
        Ok(body) => {
            let directives = RobotsDirectives::parse(&body);
            tracing::info!(
                "robots.txt: {} disallow rules, crawl delay {:?}",
                directives.disallow.len(),
                directives.crawl_delay
            );
            directives
        }
        Err(e) => {
            tracing::info!("Failed to fetch robots.txt: {}", e);
            RobotsDirectives::default()
        }
    }
}
