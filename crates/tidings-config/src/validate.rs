//! Post-merge configuration validation.

use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;

/// Upper bound for `hub.initial_buffer_capacity`.
pub const MAX_INITIAL_BUFFER_CAPACITY: usize = 1 << 20;

/// Validate a fully-merged and deserialized configuration.
///
/// # Errors
///
/// Returns the first validation error found.
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_hub(config)?;
    validate_logging(config)?;
    Ok(())
}

fn validate_hub(config: &Config) -> ConfigResult<()> {
    let capacity = config.hub.initial_buffer_capacity;
    if capacity > MAX_INITIAL_BUFFER_CAPACITY {
        return Err(ConfigError::ValidationError {
            field: "hub.initial_buffer_capacity".to_owned(),
            message: format!(
                "initial_buffer_capacity ({capacity}) exceeds maximum allowed value ({MAX_INITIAL_BUFFER_CAPACITY})"
            ),
        });
    }
    Ok(())
}

fn validate_logging(config: &Config) -> ConfigResult<()> {
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.logging.level.as_str()) {
        return Err(ConfigError::ValidationError {
            field: "logging.level".to_owned(),
            message: format!(
                "unsupported log level '{}'; expected one of: {}",
                config.logging.level,
                valid_levels.join(", ")
            ),
        });
    }

    let valid_formats = ["pretty", "compact", "json", "full"];
    if !valid_formats.contains(&config.logging.format.as_str()) {
        return Err(ConfigError::ValidationError {
            field: "logging.format".to_owned(),
            message: format!(
                "unsupported log format '{}'; expected one of: {}",
                config.logging.format,
                valid_formats.join(", ")
            ),
        });
    }

    if let Some(bad) = config
        .logging
        .directives
        .iter()
        .find(|d| d.trim().is_empty())
    {
        return Err(ConfigError::ValidationError {
            field: "logging.directives".to_owned(),
            message: format!("directive '{bad}' is empty"),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_invalid_buffer_capacity() {
        let mut config = Config::default();
        config.hub.initial_buffer_capacity = MAX_INITIAL_BUFFER_CAPACITY.saturating_mul(2);
        let err = validate(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { ref field, .. } if field == "hub.initial_buffer_capacity"));
    }

    #[test]
    fn test_zero_buffer_capacity_is_allowed() {
        let mut config = Config::default();
        config.hub.initial_buffer_capacity = 0;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_owned();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_invalid_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".to_owned();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_directive() {
        let mut config = Config::default();
        config.logging.directives = vec!["tidings_events=trace".to_owned(), "  ".to_owned()];
        assert!(validate(&config).is_err());
    }
}
