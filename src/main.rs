//! gorda CLI entry point.
//!
//! Parses command-line arguments, loads configuration, and dispatches to the
//! appropriate command handler.

use clap::Parser;
use gorda::cli::{Cli, Commands, ConfigSubcommand};
use gorda::commands::{
    config_display_command, config_reset_command, config_set_command, gui_command,
    start_command, status_command, stop_command, watch_command,
};
use gorda::completion::{parse_shell, print_completion_script};
use gorda::config::{load_config, validate_config, Config};
use gorda::logging::{init_logging, LogLevel};
use gorda::output::print_error;
use gorda::Result;

fn main() {
    let cli = Cli::parse();

    // The watch view owns the terminal, so log lines would corrupt it
    let level = match (&cli.command, cli.verbose) {
        (Some(Commands::Watch), _) => LogLevel::Silent,
        (_, true) => LogLevel::Verbose,
        (_, false) => LogLevel::Normal,
    };
    init_logging(level);

    if let Err(e) = run(cli) {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Commands that don't talk to the backend
    match &cli.command {
        Some(Commands::Config { subcommand }) => {
            return match subcommand {
                None => config_display_command(),
                Some(ConfigSubcommand::Set { key, value }) => config_set_command(key, value),
                Some(ConfigSubcommand::Reset) => config_reset_command(),
            };
        }
        Some(Commands::Completions { shell }) => {
            return print_completion_script(parse_shell(shell)?);
        }
        _ => {}
    }

    let config = resolve_config(&cli)?;
    match cli.command {
        None | Some(Commands::Gui) => gui_command(config),
        Some(Commands::Watch) => watch_command(&config),
        Some(Commands::Status) => status_command(&config),
        Some(Commands::Start) => start_command(&config),
        Some(Commands::Stop) => stop_command(&config),
        Some(Commands::Config { .. }) | Some(Commands::Completions { .. }) => Ok(()),
    }
}

/// Load the config file and apply command-line overrides.
fn resolve_config(cli: &Cli) -> Result<Config> {
    let config = load_config()?.with_overrides(&cli.overrides());
    validate_config(&config)?;
    Ok(config)
}
