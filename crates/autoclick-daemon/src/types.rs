use std::path::PathBuf;
use std::time::Duration;

use autoclick_core::config::AutoclickConfig;
use autoclick_core::controller::ControllerOptions;

/// Runtime configuration for the bridge daemon.
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    /// Unix socket the daemon listens on.
    pub socket_path: PathBuf,
    /// How long to wait for a page to answer one request.
    pub response_timeout: Duration,
    pub controller: ControllerOptions,
}

impl DaemonConfig {
    pub fn from_config(config: &AutoclickConfig) -> Self {
        Self {
            socket_path: config.socket_path(),
            response_timeout: config.response_timeout(),
            controller: ControllerOptions::from_config(config),
        }
    }
}
