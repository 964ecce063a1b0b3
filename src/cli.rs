//! Command-line definition.
//!
//! Lives in the library so shell completions are generated from the same
//! definition the binary parses.

use clap::{Parser, Subcommand};

use crate::config::ConfigOverrides;

#[derive(Parser, Debug)]
#[command(name = "gorda")]
#[command(
    version,
    about = "Desktop time tracker for a local session-tracking backend",
    after_help = "EXAMPLES:
    gorda                           # Open the tracker window
    gorda watch                     # Same view in the terminal
    gorda start                     # Start a session and print status
    gorda status --url http://127.0.0.1:9000
    gorda config set refresh_interval_secs 10"
)]
pub struct Cli {
    /// Backend base URL (overrides `backend_url` in the config file)
    #[arg(long, global = true, value_name = "URL")]
    pub url: Option<String>,

    /// Seconds between refreshes (overrides `refresh_interval_secs`)
    #[arg(long, global = true, value_name = "SECS")]
    pub interval: Option<u64>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            backend_url: self.url.clone(),
            refresh_interval_secs: self.interval,
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Open the tracker window (default)
    Gui,

    /// Show the active session and history in the terminal
    #[command(after_help = "KEYS:
    s    start a session
    x    stop the running session
    r    refresh now
    q    quit")]
    Watch,

    /// Print the active session and history once
    Status,

    /// Start a session
    Start,

    /// Stop the running session
    Stop,

    /// Show or change configuration (~/.config/gorda/config.toml)
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },

    /// Print a shell completion script to stdout
    Completions {
        /// Shell to generate completions for (bash, zsh, fish)
        shell: String,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigSubcommand {
    /// Set a configuration value
    Set {
        /// Key to set (e.g. backend_url, refresh_interval_secs, clock_format)
        key: String,
        /// New value
        value: String,
    },

    /// Restore all values to their defaults
    Reset,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_opens_gui() {
        let cli = Cli::try_parse_from(["gorda"]).unwrap();
        assert_eq!(cli.command, None);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_global_overrides_after_subcommand() {
        let cli =
            Cli::try_parse_from(["gorda", "status", "--url", "http://x:1", "--interval", "9"])
                .unwrap();
        assert_eq!(cli.command, Some(Commands::Status));
        assert_eq!(
            cli.overrides(),
            ConfigOverrides {
                backend_url: Some("http://x:1".to_string()),
                refresh_interval_secs: Some(9),
            }
        );
    }

    #[test]
    fn test_config_set_parses() {
        let cli = Cli::try_parse_from(["gorda", "config", "set", "reconcile", "rebuild"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Config {
                subcommand: Some(ConfigSubcommand::Set {
                    key: "reconcile".to_string(),
                    value: "rebuild".to_string(),
                })
            })
        );
    }
}
