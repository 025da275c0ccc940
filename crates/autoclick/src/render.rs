//! Human-readable output for `status`, `start` and `stop`.

use autoclick_core::controller::{CycleStatus, Phase, StopReport};
use autoclick_core::display::{Urgency, format_countdown};
use autoclick_core::protocol::{LABEL_UNTIL_CLICK, LABEL_UNTIL_REFRESH};
use autoclick_core::target::Target;

/// Countdown label matching what the page shows for `phase`.
fn countdown_label(phase: Phase) -> Option<&'static str> {
    match phase {
        Phase::Waiting => Some(LABEL_UNTIL_CLICK),
        Phase::Cooldown => Some(LABEL_UNTIL_REFRESH),
        _ => None,
    }
}

pub fn status_lines(status: &CycleStatus) -> Vec<String> {
    if !status.phase.is_running() {
        return vec!["Auto-refresh is not running.".to_string()];
    }

    let mut lines = vec![format!(
        "Phase:    {} (cycle #{})",
        status.phase.as_str(),
        status.cycle_count
    )];

    if let Some(target) = &status.target {
        lines.push(format!("Target:   {} ({})", target.context_id, target.origin_url));
    }

    if let Some(settings) = &status.settings {
        lines.push(format!(
            "Settings: refresh {}s, wait {}s, button {}",
            settings.refresh_interval_secs(),
            settings.wait_secs(),
            settings.button_selector()
        ));
    }

    match (countdown_label(status.phase), status.next_transition_in_secs) {
        (Some(label), Some(remaining)) => lines.push(format!(
            "{}: {} [{}]",
            label,
            format_countdown(remaining),
            Urgency::for_remaining(remaining).as_str()
        )),
        (None, _) if status.phase == Phase::AwaitingReady => {
            lines.push("Waiting for the page to signal readiness".to_string());
        }
        _ => {}
    }

    lines
}

pub fn started_line(target: &Target) -> String {
    format!(
        "Auto-refresh started on {} ({})",
        target.context_id, target.origin_url
    )
}

pub fn stopped_line(report: &StopReport) -> String {
    if report.was_running {
        format!(
            "Auto-refresh stopped after {} cycle{}",
            report.cycles_completed,
            if report.cycles_completed == 1 { "" } else { "s" }
        )
    } else {
        "Auto-refresh was not running".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autoclick_core::settings::Settings;

    fn running(phase: Phase, remaining: Option<u64>) -> CycleStatus {
        CycleStatus {
            phase,
            cycle_count: 3,
            target: Some(Target::new("tab-4", "https://shop.example")),
            settings: Some(Settings::new(60, 5, "#buy").unwrap()),
            phase_timer_live: remaining.is_some(),
            ticker_live: remaining.is_some(),
            next_transition_in_secs: remaining,
        }
    }

    #[test]
    fn test_idle_status_is_one_line() {
        let status = CycleStatus {
            phase: Phase::Idle,
            cycle_count: 0,
            target: None,
            settings: None,
            phase_timer_live: false,
            ticker_live: false,
            next_transition_in_secs: None,
        };
        assert_eq!(status_lines(&status), vec!["Auto-refresh is not running."]);
    }

    #[test]
    fn test_cooldown_shows_refresh_countdown() {
        let lines = status_lines(&running(Phase::Cooldown, Some(75)));
        assert_eq!(lines[0], "Phase:    cooldown (cycle #3)");
        assert_eq!(lines[1], "Target:   tab-4 (https://shop.example)");
        assert_eq!(lines[2], "Settings: refresh 60s, wait 5s, button #buy");
        assert_eq!(lines[3], "Time until next refresh: 1:15 [neutral]");
    }

    #[test]
    fn test_waiting_countdown_turns_red() {
        let lines = status_lines(&running(Phase::Waiting, Some(4)));
        assert_eq!(lines.last().unwrap(), "Time until button click: 0:04 [red]");
    }

    #[test]
    fn test_awaiting_ready_has_no_countdown() {
        let lines = status_lines(&running(Phase::AwaitingReady, None));
        assert_eq!(
            lines.last().unwrap(),
            "Waiting for the page to signal readiness"
        );
    }

    #[test]
    fn test_stopped_line_pluralizes() {
        let one = StopReport {
            was_running: true,
            cycles_completed: 1,
        };
        let many = StopReport {
            was_running: true,
            cycles_completed: 4,
        };
        let idle = StopReport {
            was_running: false,
            cycles_completed: 0,
        };
        assert_eq!(stopped_line(&one), "Auto-refresh stopped after 1 cycle");
        assert_eq!(stopped_line(&many), "Auto-refresh stopped after 4 cycles");
        assert_eq!(stopped_line(&idle), "Auto-refresh was not running");
    }
}
