use crate::config::types::{Config, CrawlerConfig, FetcherConfig, ParserConfig};
use crate::ConfigError;
use scraper::Selector;

/// Upper bound on retries; beyond this the backoff sleeps get absurd
const MAX_RETRIES_LIMIT: u32 = 10;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_parser_config(&config.parser)?;
    Ok(())
}

/// Validates crawl budget and link policy
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    for keyword in &config.denied_path_keywords {
        if keyword.trim().is_empty() {
            return Err(ConfigError::Validation(
                "denied_path_keywords cannot contain empty keywords".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates fetcher configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "timeout_ms must be greater than 0".to_string(),
        ));
    }

    if config.max_retries > MAX_RETRIES_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max_retries must be <= {}, got {}",
            MAX_RETRIES_LIMIT, config.max_retries
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates parser configuration
fn validate_parser_config(config: &ParserConfig) -> Result<(), ConfigError> {
    for selector in &config.boilerplate_selectors {
        Selector::parse(selector).map_err(|e| {
            ConfigError::Validation(format!("Invalid boilerplate selector '{}': {:?}", selector, e))
        })?;
    }

    Ok(())
}
