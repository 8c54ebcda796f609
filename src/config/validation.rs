use crate::config::types::Config;
use crate::ConfigError;

/// Validates a parsed configuration
///
/// Checks that every numeric knob is usable before any network work starts,
/// so a bad config fails fast instead of surfacing mid-run.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.pipeline.max_concurrent_fetches == 0 {
        return Err(ConfigError::Validation(
            "pipeline.max-concurrent-fetches must be at least 1".to_string(),
        ));
    }

    if config.pipeline.fetch_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "pipeline.fetch-timeout-secs must be at least 1".to_string(),
        ));
    }

    if config.cache.ttl_secs == 0 {
        return Err(ConfigError::Validation(
            "cache.ttl-secs must be at least 1".to_string(),
        ));
    }

    if config.cache.capacity == 0 {
        return Err(ConfigError::Validation(
            "cache.capacity must be at least 1".to_string(),
        ));
    }

    if config.user_agent.agent_name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent.agent-name must not be empty".to_string(),
        ));
    }

    if !config.user_agent.contact_url.is_empty()
        && !config.user_agent.contact_url.starts_with("http")
    {
        return Err(ConfigError::Validation(format!(
            "user-agent.contact-url must be an HTTP(S) URL, got: {}",
            config.user_agent.contact_url
        )));
    }

    Ok(())
}
