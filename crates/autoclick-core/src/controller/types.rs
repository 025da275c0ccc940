use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::AutoclickConfig;
use crate::gateway::RetryPolicy;
use crate::settings::Settings;
use crate::target::Target;

/// Where the refresh/click cycle currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Reloading,
    AwaitingReady,
    Waiting,
    Clicking,
    Cooldown,
}

impl Phase {
    pub fn is_running(&self) -> bool {
        !matches!(self, Phase::Idle)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Reloading => "reloading",
            Phase::AwaitingReady => "awaiting_ready",
            Phase::Waiting => "waiting",
            Phase::Clicking => "clicking",
            Phase::Cooldown => "cooldown",
        }
    }
}

/// Tunables that are not part of the per-run [`Settings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControllerOptions {
    pub retry: RetryPolicy,
    /// Give up on a reloaded page that never signals readiness.
    /// `None` waits indefinitely.
    pub ready_timeout: Option<Duration>,
}

impl ControllerOptions {
    pub fn from_config(config: &AutoclickConfig) -> Self {
        Self {
            retry: config.retry_policy(),
            ready_timeout: config.ready_timeout(),
        }
    }
}

/// Snapshot of the controller, answered to `status` queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleStatus {
    pub phase: Phase,
    pub cycle_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Target>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Settings>,
    pub phase_timer_live: bool,
    pub ticker_live: bool,
    /// Whole seconds until the pending phase timer fires, rounded up.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_transition_in_secs: Option<u64>,
}

/// Outcome of a `stop` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopReport {
    /// Whether a cycle was actually running.
    pub was_running: bool,
    pub cycles_completed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_wire_names() {
        assert_eq!(
            serde_json::to_string(&Phase::AwaitingReady).unwrap(),
            r#""awaiting_ready""#
        );
        assert_eq!(Phase::Cooldown.as_str(), "cooldown");
        assert!(!Phase::Idle.is_running());
        assert!(Phase::Waiting.is_running());
    }

    #[test]
    fn test_options_from_config() {
        let mut config = AutoclickConfig::default();
        config.readiness.timeout_secs = Some(45);
        config.delivery.max_attempts = Some(2);

        let options = ControllerOptions::from_config(&config);
        assert_eq!(options.ready_timeout, Some(Duration::from_secs(45)));
        assert_eq!(options.retry.max_attempts, 2);
    }
}
