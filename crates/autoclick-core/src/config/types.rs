//! Configuration type definitions for autoclick.
//!
//! # Example Configuration
//!
//! ```toml
//! [cycle]
//! refresh_interval_secs = 60
//! wait_secs = 5
//! button_selector = "button.refresh"
//!
//! [delivery]
//! max_attempts = 5
//! backoff_ms = 500
//! response_timeout_ms = 10000
//!
//! [readiness]
//! timeout_secs = 30
//!
//! [daemon]
//! socket_path = "/tmp/autoclick.sock"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration loaded from TOML config files.
///
/// Every field is optional so that a project config only overrides what it
/// actually sets; defaults are applied by the accessor methods.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AutoclickConfig {
    /// Defaults for the refresh/click cycle
    #[serde(default)]
    pub cycle: CycleConfig,

    /// Delivery retry behaviour towards the target page
    #[serde(default)]
    pub delivery: DeliveryConfig,

    /// Page readiness handshake
    #[serde(default)]
    pub readiness: ReadinessConfig,

    /// Bridge daemon settings
    #[serde(default)]
    pub daemon: DaemonSection,
}

/// Cycle defaults. CLI flags take precedence.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CycleConfig {
    /// Seconds between a button click and the next reload.
    /// Default: 60 seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_interval_secs: Option<u64>,

    /// Seconds between page readiness and the button click.
    /// Default: 5 seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait_secs: Option<u64>,

    /// CSS selector of the button to click.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_selector: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DeliveryConfig {
    /// Attempts per request before giving up.
    /// Default: 5.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_attempts: Option<u32>,

    /// Fixed pause between attempts in milliseconds.
    /// Default: 500ms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backoff_ms: Option<u64>,

    /// How long the daemon waits for a page to answer one request.
    /// Default: 10000ms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReadinessConfig {
    /// Give up waiting for a reloaded page after this many seconds and
    /// retry the cycle. Unset means wait indefinitely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DaemonSection {
    /// Unix socket the daemon listens on.
    /// Default: `~/.autoclick/autoclick.sock`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socket_path: Option<PathBuf>,
}
