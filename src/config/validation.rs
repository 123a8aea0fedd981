use crate::config::duration::parse_duration;
use crate::config::types::Config;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
///
/// Enum-typed fields (`bot-action`, `log-level`) are already enforced by
/// deserialization; everything serde cannot express is checked here.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_block_code(config.bot_block_http_code)?;
    validate_proxy_url(&config.bot_proxy_url)?;
    validate_cache_size(config.cache_size)?;
    validate_interval("cache-update-interval", &config.cache_update_interval)?;
    validate_interval(
        "robots-source-retry-interval",
        &config.robots_source_retry_interval,
    )?;
    validate_source_urls(config)?;
    Ok(())
}

/// Validates that the block status code is a legal HTTP status
fn validate_block_code(code: u16) -> Result<(), ConfigError> {
    reqwest::StatusCode::from_u16(code).map_err(|_| {
        ConfigError::Validation(format!(
            "bot-block-http-code must be a valid HTTP response code, got {}",
            code
        ))
    })?;
    Ok(())
}

/// Validates the proxy URL when one is configured
fn validate_proxy_url(proxy_url: &str) -> Result<(), ConfigError> {
    if proxy_url.is_empty() {
        return Ok(());
    }
    Url::parse(proxy_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid bot-proxy-url '{}': {}", proxy_url, e)))?;
    Ok(())
}

/// Validates the UA cache capacity
fn validate_cache_size(cache_size: usize) -> Result<(), ConfigError> {
    if cache_size == 0 {
        return Err(ConfigError::Validation(
            "cache-size must be a positive integer".to_string(),
        ));
    }
    Ok(())
}

/// Validates that a duration-typed key parses
fn validate_interval(key: &str, value: &str) -> Result<(), ConfigError> {
    parse_duration(value).map_err(|e| {
        ConfigError::InvalidDuration(format!("{} must be a duration string: {}", key, e))
    })?;
    Ok(())
}

/// Validates every URL in the comma-joined source list
fn validate_source_urls(config: &Config) -> Result<(), ConfigError> {
    let urls = config.source_urls();
    if urls.iter().all(|u| u.is_empty()) {
        return Err(ConfigError::Validation(
            "robots-source-url must contain at least one URL".to_string(),
        ));
    }
    for u in urls {
        let parsed = Url::parse(&u)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid robots-source-url '{}': {}", u, e)))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ConfigError::InvalidUrl(format!(
                "robots-source-url '{}' must use http or https",
                u
            )));
        }
    }
    Ok(())
}
