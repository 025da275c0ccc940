//! Configuration loading and merging logic.
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.autoclick/config.toml`
//! 3. **Project config** - `./.autoclick/config.toml`
//! 4. **CLI arguments** - Command-line flags (highest priority)

use crate::config::types::{
    AutoclickConfig, CycleConfig, DaemonSection, DeliveryConfig, ReadinessConfig,
};
use crate::config::validation::validate_config;
use crate::errors::ConfigError;
use std::fs;
use std::path::Path;

/// Load configuration from the hierarchy of config files.
///
/// Loads and merges configuration from:
/// 1. Default values
/// 2. User config (`~/.autoclick/config.toml`)
/// 3. Project config (`./.autoclick/config.toml`)
///
/// # Errors
///
/// Returns an error if a file exists but cannot be parsed, or if validation
/// fails. Missing config files are not errors.
pub fn load_hierarchy() -> Result<AutoclickConfig, Box<dyn std::error::Error>> {
    let mut config = AutoclickConfig::default();

    if let Some(home_dir) = dirs::home_dir() {
        let user_path = home_dir.join(".autoclick").join("config.toml");
        if let Some(user_config) = load_optional(&user_path)? {
            config = merge_configs(config, user_config);
        }
    }

    let project_path = std::env::current_dir()?
        .join(".autoclick")
        .join("config.toml");
    if let Some(project_config) = load_optional(&project_path)? {
        config = merge_configs(config, project_config);
    }

    validate_config(&config)?;

    Ok(config)
}

/// Load a config file if it exists. A missing file yields `Ok(None)`.
fn load_optional(path: &Path) -> Result<Option<AutoclickConfig>, ConfigError> {
    match load_config_file(path) {
        Ok(config) => Ok(Some(config)),
        Err(ConfigError::ConfigNotFound { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Load a configuration file from the given path.
pub fn load_config_file(path: &Path) -> Result<AutoclickConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::ConfigNotFound {
                path: path.display().to_string(),
            }
        } else {
            ConfigError::IoError { source: e }
        }
    })?;

    toml::from_str(&content).map_err(|e| ConfigError::ConfigParseError {
        message: format!("'{}': {}", path.display(), e),
    })
}

/// Merge two configurations, with override_config taking precedence.
///
/// Every field is optional, so an override only replaces values it sets.
pub fn merge_configs(base: AutoclickConfig, override_config: AutoclickConfig) -> AutoclickConfig {
    AutoclickConfig {
        cycle: CycleConfig {
            refresh_interval_secs: override_config
                .cycle
                .refresh_interval_secs
                .or(base.cycle.refresh_interval_secs),
            wait_secs: override_config.cycle.wait_secs.or(base.cycle.wait_secs),
            button_selector: override_config
                .cycle
                .button_selector
                .or(base.cycle.button_selector),
        },
        delivery: DeliveryConfig {
            max_attempts: override_config
                .delivery
                .max_attempts
                .or(base.delivery.max_attempts),
            backoff_ms: override_config
                .delivery
                .backoff_ms
                .or(base.delivery.backoff_ms),
            response_timeout_ms: override_config
                .delivery
                .response_timeout_ms
                .or(base.delivery.response_timeout_ms),
        },
        readiness: ReadinessConfig {
            timeout_secs: override_config
                .readiness
                .timeout_secs
                .or(base.readiness.timeout_secs),
        },
        daemon: DaemonSection {
            socket_path: override_config
                .daemon
                .socket_path
                .or(base.daemon.socket_path),
        },
    }
}
