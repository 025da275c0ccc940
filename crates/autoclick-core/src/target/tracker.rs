use tracing::debug;

use crate::target::types::Target;

/// Holds the one currently configured target, if any.
///
/// Owned by a single cycle controller; there is no process-wide target.
#[derive(Debug, Default)]
pub struct TargetTracker {
    current: Option<Target>,
}

impl TargetTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the tracker at a new target, replacing any previous one.
    pub fn configure(&mut self, target: Target) {
        debug!(
            event = "core.target.configured",
            context_id = %target.context_id,
            url = target.origin_url,
        );
        self.current = Some(target);
    }

    pub fn clear(&mut self) {
        if let Some(previous) = self.current.take() {
            debug!(event = "core.target.cleared", context_id = %previous.context_id);
        }
    }

    pub fn current(&self) -> Option<&Target> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty() {
        let tracker = TargetTracker::new();
        assert!(tracker.current().is_none());
    }

    #[test]
    fn test_configure_replaces_previous_target() {
        let mut tracker = TargetTracker::new();
        tracker.configure(Target::new("tab-1", "https://a.example"));
        tracker.configure(Target::new("tab-2", "https://b.example"));

        let current = tracker.current().unwrap();
        assert_eq!(current.context_id.as_str(), "tab-2");
        assert_eq!(current.origin_url, "https://b.example");
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut tracker = TargetTracker::new();
        tracker.configure(Target::new("tab-1", "https://a.example"));
        tracker.clear();
        tracker.clear();
        assert!(tracker.current().is_none());
    }
}
