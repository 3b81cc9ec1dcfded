use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Catalog API url is set
/// - Polling interval is not 0
/// - Storage prefix is not empty
/// - Server port is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.api.url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "api.url cannot be empty".to_string(),
        ));
    }

    if config.polling.interval_ms == 0 {
        return Err(ConfigError::ValidationError(
            "polling.interval_ms cannot be 0".to_string(),
        ));
    }

    if config.storage.prefix.is_empty() {
        return Err(ConfigError::ValidationError(
            "storage.prefix cannot be empty".to_string(),
        ));
    }

    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    Ok(())
}
