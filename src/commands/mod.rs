//! CLI command handlers for gorda.
//!
//! # Commands
//!
//! - [`gui`] - Open the tracker window
//! - [`watch`] - Terminal view of the same data
//! - [`status`] - Print the current session and history once
//! - [`session`] - Start or stop a session
//! - [`config`] - Show and edit the config file

mod config;
mod gui;
mod session;
mod status;
mod watch;

pub use config::{config_display_command, config_reset_command, config_set_command};
pub use gui::gui_command;
pub use session::{start_command, stop_command};
pub use status::status_command;
pub use watch::watch_command;

use crate::client::HttpBackend;
use crate::config::Config;
use crate::error::Result;

/// Build the HTTP backend described by `config`.
pub(crate) fn http_backend(config: &Config) -> Result<HttpBackend> {
    HttpBackend::new(&config.backend_url, config.request_timeout())
}
