use crate::config::types::{
    BrowserConfig, Config, CrawlerConfig, ImagesConfig, OutputConfig, UserAgentConfig,
};
use crate::ConfigError;
use url::Url;

const MAX_SETTLE_MS: u64 = 60_000;
const MAX_IMAGES_LIMIT: usize = 50;
const MAX_IMAGE_TIMEOUT_SECS: u64 = 300;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_browser_config(&config.browser)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_images_config(&config.images)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    validate_http_url("listing-url", &config.listing_url)?;

    if config.max_images < 1 || config.max_images > MAX_IMAGES_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max-images must be between 1 and {}, got {}",
            MAX_IMAGES_LIMIT, config.max_images
        )));
    }

    for (name, value) in [
        ("initial-settle-ms", config.initial_settle_ms),
        ("scroll-settle-ms", config.scroll_settle_ms),
        ("detail-settle-ms", config.detail_settle_ms),
    ] {
        if value > MAX_SETTLE_MS {
            return Err(ConfigError::Validation(format!(
                "{} must be <= {}ms, got {}ms",
                name, MAX_SETTLE_MS, value
            )));
        }
    }

    if config.max_scroll_rounds < 1 {
        return Err(ConfigError::Validation(format!(
            "max-scroll-rounds must be >= 1, got {}",
            config.max_scroll_rounds
        )));
    }

    Ok(())
}

/// Validates browser configuration
///
/// The WebDriver URL is checked even for the snapshot backend so a config
/// can be switched between backends without surprises.
fn validate_browser_config(config: &BrowserConfig) -> Result<(), ConfigError> {
    validate_http_url("webdriver-url", &config.webdriver_url)
}

fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.value.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent value cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_images_config(config: &ImagesConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "images directory cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 || config.timeout_secs > MAX_IMAGE_TIMEOUT_SECS {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be between 1 and {}, got {}",
            MAX_IMAGE_TIMEOUT_SECS, config.timeout_secs
        )));
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.content_dir.is_empty() {
        return Err(ConfigError::Validation(
            "content-dir cannot be empty".to_string(),
        ));
    }

    if config.json_path.is_empty() {
        return Err(ConfigError::Validation(
            "json-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Checks that `value` parses as an http or https URL
fn validate_http_url(name: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", name, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            name, value
        )));
    }

    Ok(())
}
