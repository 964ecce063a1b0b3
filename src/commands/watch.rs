//! Watch command handler.
//!
//! Full-screen terminal view that refreshes on the configured interval.

use crate::commands::http_backend;
use crate::config::Config;
use crate::error::Result;
use crate::ui::tui::app::run_watch;

/// Run the terminal view until the user presses `q`.
pub fn watch_command(config: &Config) -> Result<()> {
    let backend = http_backend(config)?;
    run_watch(config, Box::new(backend))
}
