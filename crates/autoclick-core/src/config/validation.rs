use crate::config::types::AutoclickConfig;
use crate::errors::ConfigError;

/// Validate the merged configuration.
///
/// Only values that are present are checked; missing values fall back to
/// defaults that are valid by construction.
pub fn validate_config(config: &AutoclickConfig) -> Result<(), ConfigError> {
    if config.cycle.refresh_interval_secs == Some(0) {
        return Err(ConfigError::InvalidConfiguration {
            message: "cycle.refresh_interval_secs must be greater than 0".to_string(),
        });
    }

    if let Some(selector) = &config.cycle.button_selector
        && selector.trim().is_empty()
    {
        return Err(ConfigError::InvalidConfiguration {
            message: "cycle.button_selector cannot be empty".to_string(),
        });
    }

    if config.delivery.max_attempts == Some(0) {
        return Err(ConfigError::InvalidConfiguration {
            message: "delivery.max_attempts must be at least 1".to_string(),
        });
    }

    if config.delivery.response_timeout_ms == Some(0) {
        return Err(ConfigError::InvalidConfiguration {
            message: "delivery.response_timeout_ms must be greater than 0".to_string(),
        });
    }

    if config.readiness.timeout_secs == Some(0) {
        return Err(ConfigError::InvalidConfiguration {
            message: "readiness.timeout_secs must be greater than 0 (omit it to wait forever)"
                .to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&AutoclickConfig::default()).is_ok());
    }

    #[test]
    fn test_zero_refresh_interval_rejected() {
        let mut config = AutoclickConfig::default();
        config.cycle.refresh_interval_secs = Some(0);
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("refresh_interval_secs"));
    }

    #[test]
    fn test_blank_selector_rejected() {
        let mut config = AutoclickConfig::default();
        config.cycle.button_selector = Some("  ".to_string());
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let mut config = AutoclickConfig::default();
        config.delivery.max_attempts = Some(0);
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("max_attempts"));
    }

    #[test]
    fn test_zero_ready_timeout_rejected() {
        let mut config = AutoclickConfig::default();
        config.readiness.timeout_secs = Some(0);
        assert!(validate_config(&config).is_err());
    }
}
