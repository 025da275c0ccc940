//! Integration tests for CLI output behavior
//!
//! The default behavior is quiet (no logs). Use -v/--verbose to enable logs.

use std::process::Command;

/// Run the binary with HOME pointed at an empty directory so no real
/// config or daemon socket is picked up.
fn run_isolated(args: &[&str]) -> std::process::Output {
    let home = tempfile::tempdir().expect("Failed to create temp home");
    Command::new(env!("CARGO_BIN_EXE_autoclick"))
        .env("HOME", home.path())
        .current_dir(home.path())
        .args(args)
        .output()
        .expect("Failed to execute autoclick")
}

#[test]
fn test_help_lists_subcommands() {
    let output = run_isolated(&["--help"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for name in ["daemon", "start", "stop", "status", "completions"] {
        assert!(stdout.contains(name), "missing '{}' in help: {}", name, stdout);
    }
}

#[test]
fn test_status_without_daemon_fails_cleanly() {
    let output = run_isolated(&["status"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Daemon is not running"),
        "Expected not-running error, got: {}",
        stderr
    );
    assert!(stderr.contains("Tip: Start it with 'autoclick daemon'"));

    // Quiet by default: no JSON log lines on stderr
    assert!(
        !stderr.lines().any(|line| line.trim_start().starts_with('{')),
        "Unexpected log output in quiet mode: {}",
        stderr
    );
}

#[test]
fn test_verbose_emits_json_logs() {
    let output = run_isolated(&["-v", "status"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr
            .lines()
            .any(|line| line.contains("\"event\":\"core.app.startup_completed\"")),
        "Expected startup log event in verbose mode, got: {}",
        stderr
    );
}

#[test]
fn test_start_without_selector_is_rejected() {
    let output = run_isolated(&["start"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("button selector"),
        "Expected selector error, got: {}",
        stderr
    );
}

#[test]
fn test_completions_generate_script() {
    let output = run_isolated(&["completions", "bash"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("autoclick"));
}
