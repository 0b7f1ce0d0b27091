use crate::config::types::{Config, CrawlerConfig, OutputConfig, SiteConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
///
/// Runs before any network activity: a crawl with an invalid configuration
/// never starts.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_output_config(&config.output)?;
    validate_site_config(config)?;
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    Ok(())
}

/// Validates the mirror destination and layout settings
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    match &config.destination {
        None => return Err(ConfigError::MissingDestination),
        Some(path) if path.as_os_str().is_empty() => return Err(ConfigError::MissingDestination),
        Some(_) => {}
    }

    let name = config.description_file.as_str();
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(ConfigError::Validation(format!(
            "description_file must be a plain file name, got '{}'",
            name
        )));
    }

    Ok(())
}

/// Validates the catalog site URLs and asset host patterns
fn validate_site_config(config: &Config) -> Result<(), ConfigError> {
    let site: &SiteConfig = &config.site;

    let base = Url::parse(&site.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;
    if base.scheme() != "http" && base.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' must use http or https",
            site.base_url
        )));
    }

    Url::parse(&config.overview_url())
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid overview_url: {}", e)))?;

    if site.asset_hosts.is_empty() {
        return Err(ConfigError::Validation(
            "asset_hosts must name at least one host".to_string(),
        ));
    }

    for pattern in &site.asset_hosts {
        validate_host_pattern(pattern)?;
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_concurrent_listings < 1 || config.max_concurrent_listings > 64 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_listings must be between 1 and 64, got {}",
            config.max_concurrent_listings
        )));
    }

    if config.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "connect_timeout_secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler_version cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates a host pattern (supports wildcards)
fn validate_host_pattern(pattern: &str) -> Result<(), ConfigError> {
    if pattern.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Host pattern cannot be empty".to_string(),
        ));
    }

    match pattern.strip_prefix("*.") {
        Some(host) => validate_host_string(host),
        None => validate_host_string(pattern),
    }
}

/// Validates a host string (without wildcard prefix)
fn validate_host_string(host: &str) -> Result<(), ConfigError> {
    if host.is_empty() {
        return Err(ConfigError::InvalidPattern("Host cannot be empty".to_string()));
    }

    if !host
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Host '{}' contains invalid characters",
            host
        )));
    }

    if host.starts_with('.') || host.ends_with('.') || host.starts_with('-') || host.ends_with('-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Host '{}' cannot start or end with '.' or '-'",
            host
        )));
    }

    if host.contains("..") {
        return Err(ConfigError::InvalidPattern(format!(
            "Host '{}' cannot contain consecutive dots",
            host
        )));
    }

    // Bare names like "localhost" are allowed so mirrors of internal hosts work.
    Ok(())
}
