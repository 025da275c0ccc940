//! Cycle settings: how often to refresh, how long to wait, what to click.
//!
//! The JSON shape matches the operator command surface:
//!
//! ```json
//! { "refreshInterval": 60, "waitTime": 5, "buttonSelector": "#submit" }
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::settings::errors::SettingsError;

/// Validated settings for one run of the refresh/click cycle.
///
/// Immutable once a cycle starts; a new `start` replaces them wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSettings", into = "RawSettings")]
pub struct Settings {
    refresh_interval_secs: u64,
    wait_secs: u64,
    button_selector: String,
}

/// Unvalidated wire form of [`Settings`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSettings {
    refresh_interval: u64,
    wait_time: u64,
    button_selector: String,
}

impl Settings {
    pub fn new(
        refresh_interval_secs: u64,
        wait_secs: u64,
        button_selector: impl Into<String>,
    ) -> Result<Self, SettingsError> {
        let button_selector = button_selector.into();

        if refresh_interval_secs == 0 {
            return Err(SettingsError::InvalidRefreshInterval);
        }
        if button_selector.trim().is_empty() {
            return Err(SettingsError::EmptySelector);
        }

        Ok(Self {
            refresh_interval_secs,
            wait_secs,
            button_selector,
        })
    }

    pub fn refresh_interval_secs(&self) -> u64 {
        self.refresh_interval_secs
    }

    pub fn wait_secs(&self) -> u64 {
        self.wait_secs
    }

    pub fn button_selector(&self) -> &str {
        &self.button_selector
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn wait(&self) -> Duration {
        Duration::from_secs(self.wait_secs)
    }
}

impl TryFrom<RawSettings> for Settings {
    type Error = SettingsError;

    fn try_from(raw: RawSettings) -> Result<Self, Self::Error> {
        Settings::new(raw.refresh_interval, raw.wait_time, raw.button_selector)
    }
}

impl From<Settings> for RawSettings {
    fn from(settings: Settings) -> Self {
        Self {
            refresh_interval: settings.refresh_interval_secs,
            wait_time: settings.wait_secs,
            button_selector: settings.button_selector,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_settings() {
        let settings = Settings::new(60, 5, "#submit").unwrap();
        assert_eq!(settings.refresh_interval(), Duration::from_secs(60));
        assert_eq!(settings.wait(), Duration::from_secs(5));
        assert_eq!(settings.button_selector(), "#submit");
    }

    #[test]
    fn test_zero_wait_is_allowed() {
        let settings = Settings::new(30, 0, "button.go").unwrap();
        assert_eq!(settings.wait_secs(), 0);
    }

    #[test]
    fn test_zero_refresh_interval_rejected() {
        let result = Settings::new(0, 5, "#submit");
        assert!(matches!(result, Err(SettingsError::InvalidRefreshInterval)));
    }

    #[test]
    fn test_blank_selector_rejected() {
        let result = Settings::new(60, 5, "   ");
        assert!(matches!(result, Err(SettingsError::EmptySelector)));
    }

    #[test]
    fn test_wire_format_field_names() {
        let settings = Settings::new(60, 5, "#submit").unwrap();
        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(json["refreshInterval"], 60);
        assert_eq!(json["waitTime"], 5);
        assert_eq!(json["buttonSelector"], "#submit");
    }

    #[test]
    fn test_deserialize_validates() {
        let json = r##"{"refreshInterval":0,"waitTime":5,"buttonSelector":"#a"}"##;
        let result: Result<Settings, _> = serde_json::from_str(json);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("refresh interval"), "got: {}", err);
    }
}
