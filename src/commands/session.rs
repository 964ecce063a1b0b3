//! Start and stop command handlers.

use crate::client::Backend;
use crate::commands::http_backend;
use crate::commands::status::load_dashboard;
use crate::config::Config;
use crate::error::Result;
use crate::output::{print_info, print_status};
use chrono::Utc;

/// Start a session, then print the refreshed status.
pub fn start_command(config: &Config) -> Result<()> {
    let backend = http_backend(config)?;
    run_action(config, &backend, Action::Start)
}

/// Stop the running session, then print the refreshed status.
pub fn stop_command(config: &Config) -> Result<()> {
    let backend = http_backend(config)?;
    run_action(config, &backend, Action::Stop)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Start,
    Stop,
}

fn run_action(config: &Config, backend: &dyn Backend, action: Action) -> Result<()> {
    match action {
        Action::Start => {
            backend.start()?;
            print_info("Session started");
        }
        Action::Stop => {
            backend.stop()?;
            print_info("Session stopped");
        }
    }
    tracing::info!(event = "cli.action_completed", action = ?action);
    println!();

    let dashboard = load_dashboard(config, backend)?;
    print_status(
        &dashboard.active_labels(Utc::now()),
        dashboard.is_running(),
        dashboard.rows(),
    );
    Ok(())
}
