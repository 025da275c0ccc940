use std::path::PathBuf;

use clap::ArgMatches;
use tracing::{error, info, warn};

use autoclick_core::config::AutoclickConfig;
use autoclick_core::events;
use autoclick_core::settings::Settings;
use autoclick_daemon::{DaemonClient, DaemonConfig, DaemonError};

use crate::render;

mod completions;

/// Load configuration with warning on errors.
///
/// Falls back to defaults if config loading fails, but notifies the user via:
/// - stderr message for immediate visibility
/// - structured log event `cli.config.load_failed` for debugging
fn load_config_with_warning() -> AutoclickConfig {
    match AutoclickConfig::load_hierarchy() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Could not load config: {}. Using defaults.\n\
                 Tip: Check ~/.autoclick/config.toml and ./.autoclick/config.toml for syntax errors.",
                e
            );
            warn!(
                event = "cli.config.load_failed",
                error = %e,
                "Config load failed, using defaults"
            );
            AutoclickConfig::default()
        }
    }
}

/// Config with the global `--socket` flag applied.
fn load_config(matches: &ArgMatches) -> AutoclickConfig {
    let mut config = load_config_with_warning();
    if let Some(socket) = matches.get_one::<PathBuf>("socket") {
        config.daemon.socket_path = Some(socket.clone());
    }
    config
}

fn runtime() -> Result<tokio::runtime::Runtime, Box<dyn std::error::Error>> {
    Ok(tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?)
}

/// Print a daemon failure with a hint the user can act on.
fn report_daemon_error(command: &str, e: &DaemonError) {
    eprintln!("Error: {}", e);
    if matches!(e, DaemonError::NotRunning) {
        eprintln!("Tip: Start it with 'autoclick daemon'.");
    }
    error!(event = "cli.daemon_request_failed", command = command, error = %e);
    events::log_app_error(e);
}

pub fn run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    events::log_app_startup();

    match matches.subcommand() {
        Some(("daemon", sub_matches)) => handle_daemon_command(sub_matches),
        Some(("start", sub_matches)) => handle_start_command(sub_matches),
        Some(("stop", sub_matches)) => handle_stop_command(sub_matches),
        Some(("status", sub_matches)) => handle_status_command(sub_matches),
        Some(("shutdown", sub_matches)) => handle_shutdown_command(sub_matches),
        Some(("completions", sub_matches)) => {
            completions::handle_completions_command(sub_matches)
        }
        _ => {
            error!(event = "cli.command_unknown");
            Err("Unknown command".into())
        }
    }
}

fn handle_daemon_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(matches);
    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        error!(event = "cli.daemon_failed", error = %e);
        return Err(e.into());
    }

    let daemon_config = DaemonConfig::from_config(&config);
    info!(
        event = "cli.daemon_started",
        socket = %daemon_config.socket_path.display()
    );
    println!(
        "autoclick daemon listening on {}",
        daemon_config.socket_path.display()
    );

    let result = runtime()?.block_on(autoclick_daemon::run_server(daemon_config));
    events::log_app_shutdown();

    if let Err(e) = result {
        report_daemon_error("daemon", &e);
        return Err(e.into());
    }
    Ok(())
}

/// Merge `start` flags over the configured cycle defaults.
fn start_settings(
    matches: &ArgMatches,
    config: &mut AutoclickConfig,
) -> Result<Settings, Box<dyn std::error::Error>> {
    if let Some(interval) = matches.get_one::<u64>("interval") {
        config.cycle.refresh_interval_secs = Some(*interval);
    }
    if let Some(wait) = matches.get_one::<u64>("wait") {
        config.cycle.wait_secs = Some(*wait);
    }
    if let Some(selector) = matches.get_one::<String>("selector") {
        config.cycle.button_selector = Some(selector.clone());
    }

    config.validate()?;
    Ok(config.settings()?)
}

fn handle_start_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = matches.get_flag("json");
    let mut config = load_config(matches);

    let settings = match start_settings(matches, &mut config) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {}", e);
            error!(event = "cli.start_failed", error = %e);
            return Err(e);
        }
    };

    info!(
        event = "cli.start_started",
        refresh_interval_secs = settings.refresh_interval_secs(),
        wait_secs = settings.wait_secs(),
        selector = settings.button_selector()
    );

    let socket_path = config.socket_path();
    let result = runtime()?.block_on(async {
        let mut client = DaemonClient::connect(&socket_path).await?;
        client.start(settings).await
    });

    match result {
        Ok(target) => {
            if json_output {
                println!("{}", serde_json::to_string_pretty(&target)?);
            } else {
                println!("{}", render::started_line(&target));
            }
            info!(event = "cli.start_completed", context_id = %target.context_id);
            Ok(())
        }
        Err(e) => {
            report_daemon_error("start", &e);
            Err(e.into())
        }
    }
}

fn handle_stop_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = matches.get_flag("json");
    let socket_path = load_config(matches).socket_path();

    let result = runtime()?.block_on(async {
        let mut client = DaemonClient::connect(&socket_path).await?;
        client.stop().await
    });

    match result {
        Ok(report) => {
            if json_output {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", render::stopped_line(&report));
            }
            info!(
                event = "cli.stop_completed",
                was_running = report.was_running,
                cycles_completed = report.cycles_completed
            );
            Ok(())
        }
        Err(e) => {
            report_daemon_error("stop", &e);
            Err(e.into())
        }
    }
}

fn handle_status_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = matches.get_flag("json");
    let socket_path = load_config(matches).socket_path();

    let result = runtime()?.block_on(async {
        let mut client = DaemonClient::connect(&socket_path).await?;
        client.status().await
    });

    match result {
        Ok(status) => {
            if json_output {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                for line in render::status_lines(&status) {
                    println!("{}", line);
                }
            }
            Ok(())
        }
        Err(e) => {
            report_daemon_error("status", &e);
            Err(e.into())
        }
    }
}

fn handle_shutdown_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let socket_path = load_config(matches).socket_path();

    let result = runtime()?.block_on(async {
        let mut client = DaemonClient::connect(&socket_path).await?;
        client.shutdown().await
    });

    match result {
        Ok(()) => {
            println!("autoclick daemon stopping");
            info!(event = "cli.shutdown_completed");
            Ok(())
        }
        Err(e) => {
            report_daemon_error("shutdown", &e);
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::build_cli;

    fn start_matches(args: &[&str]) -> ArgMatches {
        let mut argv = vec!["autoclick", "start"];
        argv.extend_from_slice(args);
        let matches = build_cli().try_get_matches_from(argv).unwrap();
        matches.subcommand_matches("start").unwrap().clone()
    }

    #[test]
    fn test_start_flags_override_config() {
        let mut config = AutoclickConfig::default();
        config.cycle.refresh_interval_secs = Some(120);
        config.cycle.button_selector = Some("#from-config".to_string());

        let matches = start_matches(&["--wait", "2", "--selector", "#from-cli"]);
        let settings = start_settings(&matches, &mut config).unwrap();

        assert_eq!(settings.refresh_interval_secs(), 120);
        assert_eq!(settings.wait_secs(), 2);
        assert_eq!(settings.button_selector(), "#from-cli");
    }

    #[test]
    fn test_start_without_selector_fails() {
        let mut config = AutoclickConfig::default();
        let matches = start_matches(&[]);
        assert!(start_settings(&matches, &mut config).is_err());
    }

    #[test]
    fn test_start_rejects_zero_interval() {
        let mut config = AutoclickConfig::default();
        let matches = start_matches(&["--interval", "0", "--selector", "#go"]);
        assert!(start_settings(&matches, &mut config).is_err());
    }
}
