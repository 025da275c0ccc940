//! Default values and the accessors that apply them.

use std::path::PathBuf;
use std::time::Duration;

use crate::config::types::AutoclickConfig;
use crate::gateway::RetryPolicy;
use crate::settings::{Settings, SettingsError};

pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_WAIT_SECS: u64 = 5;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_BACKOFF_MS: u64 = 500;
pub const DEFAULT_RESPONSE_TIMEOUT_MS: u64 = 10_000;

/// Base directory for autoclick state (default: `~/.autoclick`).
pub fn autoclick_dir() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home.join(".autoclick"),
        None => {
            eprintln!(
                "Warning: Could not find home directory. Set HOME environment variable. \
                Using fallback directory."
            );
            std::env::temp_dir().join(".autoclick")
        }
    }
}

pub fn default_socket_path() -> PathBuf {
    autoclick_dir().join("autoclick.sock")
}

impl AutoclickConfig {
    pub fn refresh_interval_secs(&self) -> u64 {
        self.cycle
            .refresh_interval_secs
            .unwrap_or(DEFAULT_REFRESH_INTERVAL_SECS)
    }

    pub fn wait_secs(&self) -> u64 {
        self.cycle.wait_secs.unwrap_or(DEFAULT_WAIT_SECS)
    }

    /// Build validated cycle settings from the merged configuration.
    pub fn settings(&self) -> Result<Settings, SettingsError> {
        let selector = self
            .cycle
            .button_selector
            .clone()
            .ok_or(SettingsError::MissingSelector)?;
        Settings::new(self.refresh_interval_secs(), self.wait_secs(), selector)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.delivery.max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS),
            backoff: Duration::from_millis(self.delivery.backoff_ms.unwrap_or(DEFAULT_BACKOFF_MS)),
        }
    }

    pub fn response_timeout(&self) -> Duration {
        Duration::from_millis(
            self.delivery
                .response_timeout_ms
                .unwrap_or(DEFAULT_RESPONSE_TIMEOUT_MS),
        )
    }

    /// `None` keeps the unbounded wait for page readiness.
    pub fn ready_timeout(&self) -> Option<Duration> {
        self.readiness.timeout_secs.map(Duration::from_secs)
    }

    pub fn socket_path(&self) -> PathBuf {
        self.daemon
            .socket_path
            .clone()
            .unwrap_or_else(default_socket_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let config = AutoclickConfig::default();
        assert_eq!(config.refresh_interval_secs(), 60);
        assert_eq!(config.wait_secs(), 5);
        assert_eq!(config.retry_policy(), RetryPolicy::default());
        assert_eq!(config.response_timeout(), Duration::from_secs(10));
        assert!(config.ready_timeout().is_none());
        assert!(config.socket_path().ends_with("autoclick.sock"));
    }

    #[test]
    fn test_settings_require_selector() {
        let config = AutoclickConfig::default();
        assert!(matches!(
            config.settings(),
            Err(SettingsError::MissingSelector)
        ));
    }

    #[test]
    fn test_settings_from_config() {
        let mut config = AutoclickConfig::default();
        config.cycle.button_selector = Some("#go".to_string());
        config.cycle.wait_secs = Some(0);

        let settings = config.settings().unwrap();
        assert_eq!(settings.refresh_interval_secs(), 60);
        assert_eq!(settings.wait_secs(), 0);
        assert_eq!(settings.button_selector(), "#go");
    }
}
