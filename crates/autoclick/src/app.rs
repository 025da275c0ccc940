use clap::{Arg, ArgAction, Command};
use clap_complete::Shell;

pub fn build_cli() -> Command {
    Command::new("autoclick")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Reload a page on a timer and click a button after it settles")
        .long_about("autoclick drives a refresh/click cycle against a browser page: reload, wait for the page to signal readiness, count down, click the configured button, then count down to the next reload. Pages connect to the autoclick daemon through a small bridge; the CLI starts, stops and inspects the cycle.")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("socket")
                .long("socket")
                .short('s')
                .help("Daemon socket path (overrides config)")
                .value_parser(clap::value_parser!(std::path::PathBuf))
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("daemon")
                .about("Run the bridge daemon in the foreground")
        )
        .subcommand(
            Command::new("start")
                .about("Start the refresh/click cycle on the active page")
                .arg(
                    Arg::new("interval")
                        .long("interval")
                        .short('i')
                        .help("Seconds from a button click to the next reload (overrides config, default: 60)")
                        .value_parser(clap::value_parser!(u64))
                )
                .arg(
                    Arg::new("wait")
                        .long("wait")
                        .short('w')
                        .help("Seconds from page ready to the button click (overrides config, default: 5)")
                        .value_parser(clap::value_parser!(u64))
                )
                .arg(
                    Arg::new("selector")
                        .long("selector")
                        .help("CSS selector of the button to click (overrides config)")
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output in JSON format")
                        .action(ArgAction::SetTrue)
                )
        )
        .subcommand(
            Command::new("stop")
                .about("Stop the running cycle")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output in JSON format")
                        .action(ArgAction::SetTrue)
                )
        )
        .subcommand(
            Command::new("status")
                .about("Show the cycle's phase, target and countdown")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output in JSON format")
                        .action(ArgAction::SetTrue)
                )
        )
        .subcommand(
            Command::new("shutdown")
                .about("Stop the cycle and exit the daemon")
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .help("Target shell")
                        .required(true)
                        .index(1)
                        .value_parser(clap::value_parser!(Shell))
                )
        )
}
