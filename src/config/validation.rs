use crate::config::types::{AuthConfig, Config, CrawlerConfig};
use crate::url::parse_seed_url;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    seed_url(config)?;
    validate_crawler_config(&config.crawler)?;
    if let Some(auth) = &config.auth {
        validate_auth_config(auth)?;
    }
    Ok(())
}

/// Returns the validated seed URL
pub fn seed_url(config: &Config) -> Result<Url, ConfigError> {
    let seed = config
        .seed
        .as_deref()
        .ok_or_else(|| ConfigError::Validation("URL argument required".to_string()))?;

    parse_seed_url(seed).map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", seed, e)))
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    // max_depth >= 0 is always true for u32, so no check needed

    if config.connections < 1 {
        return Err(ConfigError::Validation(format!(
            "connections must be >= 1, got {}",
            config.connections
        )));
    }

    if config.workers == Some(0) {
        return Err(ConfigError::Validation(
            "workers must be >= 1 when set".to_string(),
        ));
    }

    if config.queue_capacity < 1 {
        return Err(ConfigError::Validation(format!(
            "queue-capacity must be >= 1, got {}",
            config.queue_capacity
        )));
    }

    if config.timeout < 1 {
        return Err(ConfigError::Validation(
            "timeout must be >= 1 second".to_string(),
        ));
    }

    if let Some(delay) = config.delay {
        if !delay.is_finite() || delay < 0.0 {
            return Err(ConfigError::Validation(format!(
                "delay must be a non-negative number of seconds, got {}",
                delay
            )));
        }
    }

    Ok(())
}

/// Validates basic-auth credentials
fn validate_auth_config(config: &AuthConfig) -> Result<(), ConfigError> {
    if config.username.is_empty() {
        return Err(ConfigError::Validation(
            "auth username cannot be empty".to_string(),
        ));
    }
    Ok(())
}
