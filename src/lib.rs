pub mod cli;
pub mod client;
pub mod commands;
pub mod completion;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod output;
pub mod reconcile;
pub mod refresh;
pub mod session;
pub mod ui;

pub use client::{Backend, HttpBackend};
pub use config::Config;
pub use error::{GordaError, Result};
pub use reconcile::{ReconcileMode, SessionList};
pub use session::Session;
