use crate::config::types::{Config, FetchConfig, OutputConfig, SiteConfig};
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetch_config(&config.fetch)?;
    validate_site_config(&config.site)?;
    validate_output_config(&config.output)?;
    validate_districts(config)?;
    Ok(())
}

fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.min_delay_ms > config.max_delay_ms {
        return Err(ConfigError::Validation(format!(
            "min-delay-ms ({}) must not exceed max-delay-ms ({})",
            config.min_delay_ms, config.max_delay_ms
        )));
    }

    if config.save_interval < 1 {
        return Err(ConfigError::Validation(format!(
            "save-interval must be >= 1, got {}",
            config.save_interval
        )));
    }

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max-pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    Ok(())
}

fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let base =
        Url::parse(&config.base_url).map_err(|_| ConfigError::InvalidUrl(config.base_url.clone()))?;

    if base.scheme() != "http" && base.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(config.base_url.clone()));
    }

    if !config.search_path.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "search-path must start with '/', got '{}'",
            config.search_path
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    for (field, value) in [
        ("listings-dir", &config.listings_dir),
        ("cleaned-dir", &config.cleaned_dir),
        ("details-dir", &config.details_dir),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "{} cannot be empty",
                field
            )));
        }
    }
    Ok(())
}

fn validate_districts(config: &Config) -> Result<(), ConfigError> {
    if config.districts.is_empty() {
        return Err(ConfigError::Validation(
            "at least one district must be configured".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for district in &config.districts {
        if district.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "district {} has an empty name",
                district.id
            )));
        }
        if !seen.insert(district.id) {
            return Err(ConfigError::Validation(format!(
                "duplicate district id {}",
                district.id
            )));
        }
    }

    Ok(())
}
