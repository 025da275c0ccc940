//! The human-readable cycle log.
//!
//! Every line goes to a local sink and, while a target is configured, is
//! mirrored into the target's own console. Mirroring is fire-and-forget:
//! a page that is mid-navigation simply misses the line.

use std::sync::{Arc, Mutex};

use tracing::{error, info};

use crate::host::{HostError, TargetHost};
use crate::target::ContextId;

/// Somewhere a diagnostic line can be written. Implementations must not block.
pub trait DiagnosticSink: Send + Sync {
    fn write_line(&self, line: &str, is_error: bool) -> Result<(), HostError>;
}

/// Local sink backed by `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn write_line(&self, line: &str, is_error: bool) -> Result<(), HostError> {
        if is_error {
            error!(event = "core.cycle.log", line = line);
        } else {
            info!(event = "core.cycle.log", line = line);
        }
        Ok(())
    }
}

/// Sink that injects lines into a target context's console.
pub struct ContextConsole<H> {
    host: Arc<H>,
    context: ContextId,
}

impl<H: TargetHost> ContextConsole<H> {
    pub fn new(host: Arc<H>, context: ContextId) -> Self {
        Self { host, context }
    }
}

impl<H: TargetHost> DiagnosticSink for ContextConsole<H> {
    fn write_line(&self, line: &str, is_error: bool) -> Result<(), HostError> {
        self.host.console(&self.context, line, is_error)
    }
}

/// Sink that keeps every line in memory.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    lines: Arc<Mutex<Vec<(String, bool)>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of `(line, is_error)` pairs written so far.
    pub fn lines(&self) -> Vec<(String, bool)> {
        match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|(line, _)| line.contains(needle))
    }
}

impl DiagnosticSink for RecordingSink {
    fn write_line(&self, line: &str, is_error: bool) -> Result<(), HostError> {
        match self.lines.lock() {
            Ok(mut lines) => lines.push((line.to_string(), is_error)),
            Err(poisoned) => poisoned.into_inner().push((line.to_string(), is_error)),
        }
        Ok(())
    }
}

/// Timestamped logger writing to a local sink and, optionally, a target sink.
pub struct DiagnosticLogger {
    local: Arc<dyn DiagnosticSink>,
    target: Option<Arc<dyn DiagnosticSink>>,
}

impl DiagnosticLogger {
    pub fn new(local: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            local,
            target: None,
        }
    }

    /// Mirror subsequent lines into `sink`.
    pub fn attach_target(&mut self, sink: Arc<dyn DiagnosticSink>) {
        self.target = Some(sink);
    }

    pub fn detach_target(&mut self) {
        self.target = None;
    }

    pub fn info(&self, message: &str) {
        self.log(message, false);
    }

    pub fn error(&self, message: &str) {
        self.log(message, true);
    }

    /// Write `message` with a wall-clock prefix. Never fails.
    pub fn log(&self, message: &str, is_error: bool) {
        let line = format!("[{}] {}", clock_time(chrono::Local::now()), message);

        let _ = self.local.write_line(&line, is_error);

        if let Some(target) = &self.target {
            let _ = target.write_line(&line, is_error);
        }
    }
}

/// Local `HH:MM:SS` rendering used in diagnostic lines.
pub fn clock_time(at: chrono::DateTime<chrono::Local>) -> String {
    at.format("%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingSink;

    impl DiagnosticSink for FailingSink {
        fn write_line(&self, _line: &str, _is_error: bool) -> Result<(), HostError> {
            Err(HostError::ContextClosed {
                context: "tab-1".to_string(),
            })
        }
    }

    #[test]
    fn test_lines_carry_timestamp_prefix() {
        let local = RecordingSink::new();
        let logger = DiagnosticLogger::new(Arc::new(local.clone()));

        logger.info("hello");

        let lines = local.lines();
        assert_eq!(lines.len(), 1);
        let (line, is_error) = &lines[0];
        assert!(!is_error);
        assert!(line.starts_with('['));
        assert!(line.ends_with("] hello"), "got: {}", line);
        // "[HH:MM:SS] hello"
        assert_eq!(line.len(), "[00:00:00] hello".len());
    }

    #[test]
    fn test_mirrors_identical_line_to_target() {
        let local = RecordingSink::new();
        let target = RecordingSink::new();
        let mut logger = DiagnosticLogger::new(Arc::new(local.clone()));
        logger.attach_target(Arc::new(target.clone()));

        logger.error("boom");

        assert_eq!(local.lines(), target.lines());
        assert!(target.lines()[0].1);
    }

    #[test]
    fn test_failing_target_sink_is_swallowed() {
        let local = RecordingSink::new();
        let mut logger = DiagnosticLogger::new(Arc::new(local.clone()));
        logger.attach_target(Arc::new(FailingSink));

        logger.info("still logged locally");

        assert!(local.contains("still logged locally"));
    }

    #[test]
    fn test_detach_stops_mirroring() {
        let local = RecordingSink::new();
        let target = RecordingSink::new();
        let mut logger = DiagnosticLogger::new(Arc::new(local.clone()));
        logger.attach_target(Arc::new(target.clone()));
        logger.detach_target();

        logger.info("local only");

        assert!(target.lines().is_empty());
        assert_eq!(local.lines().len(), 1);
    }

    #[test]
    fn test_tracing_sink_never_fails() {
        assert!(TracingSink.write_line("line", false).is_ok());
        assert!(TracingSink.write_line("line", true).is_ok());
    }
}
