use anyhow::Result;
use clap::{Arg, ArgAction, Command};

use glucmon::commands;

fn url_arg() -> Arg {
    Arg::new("url")
        .short('u')
        .long("url")
        .value_name("URL")
        .help("Nightscout site to read from (overrides the settings file)")
}

fn token_arg() -> Arg {
    Arg::new("token")
        .short('t')
        .long("token")
        .value_name("TOKEN")
        .help("Nightscout read token (overrides the settings file)")
}

fn main() -> Result<()> {
    glucmon::init_logging();

    let matches = Command::new("glucmon")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Nightscout glucose monitor with desktop alerts")
        .disable_version_flag(true)
        .arg(
            Arg::new("version")
                .short('v')
                .short_alias('V')
                .long("version")
                .help("Print version information")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Settings file to use instead of the default location")
                .global(true),
        )
        .subcommand(
            Command::new("watch")
                .about("Poll the feed and raise alerts until interrupted")
                .arg(url_arg())
                .arg(token_arg())
                .arg(
                    Arg::new("interval")
                        .short('i')
                        .long("interval")
                        .value_name("SECONDS")
                        .help("Seconds between polls (overrides the settings file)")
                        .value_parser(clap::value_parser!(u64).range(1..)),
                )
                .arg(
                    Arg::new("no-desktop")
                        .long("no-desktop")
                        .help("Log alerts instead of posting desktop notifications")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("verbose")
                        .long("verbose")
                        .help("Print a status line on every poll, not only on changes")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Fetch and evaluate the latest reading once")
                .arg(url_arg())
                .arg(token_arg())
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print the outcome as JSON")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("notify")
                        .long("notify")
                        .help("Also post notifications for the reading")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Show or change settings (use 'glucmon config --help' for subcommands)")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(Command::new("show").about("Show the current settings"))
                .subcommand(Command::new("path").about("Print the settings file location"))
                .subcommand(
                    Command::new("set")
                        .about("Set a value (url, token, timeout, interval, stale-after, urgent-low, low, high, urgent-high, rising, falling, low-comparison, variability-basis)")
                        .arg(
                            Arg::new("key")
                                .help("Setting name")
                                .required(true)
                                .index(1),
                        )
                        .arg(
                            Arg::new("value")
                                .help("New value")
                                .required(true)
                                .allow_hyphen_values(true)
                                .index(2),
                        ),
                )
                .subcommand(
                    Command::new("enable")
                        .about("Enable an alert (urgent-low, low, high, urgent-high, variability)")
                        .arg(Arg::new("alert").required(true).index(1)),
                )
                .subcommand(
                    Command::new("disable")
                        .about("Disable an alert (urgent-low, low, high, urgent-high, variability)")
                        .arg(Arg::new("alert").required(true).index(1)),
                )
                .subcommand(
                    Command::new("reset")
                        .about("Restore default settings")
                        .arg(
                            Arg::new("yes")
                                .short('y')
                                .long("yes")
                                .help("Do not ask for confirmation")
                                .action(ArgAction::SetTrue),
                        ),
                ),
        )
        .subcommand(Command::new("version").about("Shows version information"))
        .get_matches();

    if matches.get_flag("version") {
        println!("glucmon version {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    match matches.subcommand() {
        Some(("watch", sub_matches)) => commands::watch::execute(sub_matches)?,
        Some(("check", sub_matches)) => commands::check::execute(sub_matches)?,
        Some(("config", sub_matches)) => commands::config::execute(sub_matches)?,
        Some(("version", _)) => {
            println!("glucmon version {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            println!("Use 'glucmon watch' to start monitoring.");
            println!("Use 'glucmon --help' for more information.");
        }
    }

    Ok(())
}
