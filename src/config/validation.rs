use crate::config::types::{Config, CrawlerConfig, HubConfig, OutputConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_hub_config(&config.hub)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.crawl_budget < 1 {
        return Err(ConfigError::Validation(format!(
            "crawl_budget must be >= 1, got {}",
            config.crawl_budget
        )));
    }

    if config.root_scheme != "https" && config.root_scheme != "http" {
        return Err(ConfigError::Validation(format!(
            "root_scheme must be 'https' or 'http', got '{}'",
            config.root_scheme
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    if config.domain_deadline_secs == Some(0) {
        return Err(ConfigError::Validation(
            "domain_deadline_secs must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.header.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent header cannot be empty".to_string(),
        ));
    }

    // Must be a legal header value
    if config.header.chars().any(|c| c.is_control()) {
        return Err(ConfigError::Validation(
            "user-agent header cannot contain control characters".to_string(),
        ));
    }

    Ok(())
}

/// Validates hub configuration
fn validate_hub_config(config: &HubConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid hub base_url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Hub base_url '{}' must use http or https",
            config.base_url
        )));
    }

    if config.num_domains < 1 {
        return Err(ConfigError::Validation(format!(
            "num_domains must be >= 1, got {}",
            config.num_domains
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if let Some(dir) = &config.image_dir {
        if dir.trim().is_empty() {
            return Err(ConfigError::Validation(
                "image_dir cannot be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}
