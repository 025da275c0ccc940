//! Formatting helpers for the countdown display.

use serde::Serialize;

/// Colour band of the countdown bubble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    /// Five seconds or less (red).
    Critical,
    /// Ten seconds or less (amber).
    Warning,
    Normal,
}

impl Urgency {
    pub fn for_remaining(remaining_secs: u64) -> Self {
        match remaining_secs {
            0..=5 => Urgency::Critical,
            6..=10 => Urgency::Warning,
            _ => Urgency::Normal,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Critical => "red",
            Urgency::Warning => "amber",
            Urgency::Normal => "neutral",
        }
    }
}

/// Render seconds as `m:ss`.
pub fn format_countdown(remaining_secs: u64) -> String {
    format!("{}:{:02}", remaining_secs / 60, remaining_secs % 60)
}
