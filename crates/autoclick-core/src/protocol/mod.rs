//! Messages the controller sends to the target context.

use serde::{Deserialize, Serialize};

/// Label shown while counting down to the button click.
pub const LABEL_UNTIL_CLICK: &str = "Time until button click";

/// Label shown while counting down to the next reload.
pub const LABEL_UNTIL_REFRESH: &str = "Time until next refresh";

/// Label of the final display update sent when the cycle stops.
pub const LABEL_STOPPED: &str = "Auto-refresh stopped";

/// Controller -> target request.
///
/// Each variant maps to a JSON object with `"action"` as the tag field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum TargetRequest {
    /// Click the first element matching `selector`.
    ClickButton { selector: String },

    /// Refresh the countdown display.
    #[serde(rename_all = "camelCase")]
    UpdateTimer { label: String, remaining_seconds: u64 },

    /// Reload the page. The target announces readiness once it is back.
    Reload,
}

impl TargetRequest {
    pub fn click(selector: impl Into<String>) -> Self {
        TargetRequest::ClickButton {
            selector: selector.into(),
        }
    }

    pub fn update_timer(label: impl Into<String>, remaining_seconds: u64) -> Self {
        TargetRequest::UpdateTimer {
            label: label.into(),
            remaining_seconds,
        }
    }

    /// Short name used in structured logs.
    pub fn action(&self) -> &'static str {
        match self {
            TargetRequest::ClickButton { .. } => "clickButton",
            TargetRequest::UpdateTimer { .. } => "updateTimer",
            TargetRequest::Reload => "reload",
        }
    }
}

/// Target -> controller reply to a [`TargetRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetResponse {
    pub success: bool,
}

impl TargetResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }

    pub fn failed() -> Self {
        Self { success: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_button_wire_shape() {
        let json = serde_json::to_value(TargetRequest::click("#go")).unwrap();
        assert_eq!(json, serde_json::json!({"action": "clickButton", "selector": "#go"}));
    }

    #[test]
    fn test_update_timer_wire_shape() {
        let json = serde_json::to_value(TargetRequest::update_timer(LABEL_UNTIL_CLICK, 4)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "action": "updateTimer",
                "label": "Time until button click",
                "remainingSeconds": 4
            })
        );
    }

    #[test]
    fn test_reload_parses() {
        let req: TargetRequest = serde_json::from_str(r#"{"action":"reload"}"#).unwrap();
        assert_eq!(req, TargetRequest::Reload);
        assert_eq!(req.action(), "reload");
    }
}
