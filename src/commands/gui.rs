//! GUI command handler.

use crate::commands::http_backend;
use crate::config::Config;
use crate::error::Result;
use crate::ui::gui::app::run_gui;

/// Open the tracker window and block until it is closed.
///
/// # Returns
///
/// * `Ok(())` when the user closes the window
/// * `Err(GordaError)` if the backend URL is invalid or the window fails to open
pub fn gui_command(config: Config) -> Result<()> {
    let backend = http_backend(&config)?;
    run_gui(config, Box::new(backend))
}
