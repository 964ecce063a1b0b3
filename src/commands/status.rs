//! Status command handler.
//!
//! One-shot fetch of the active session and the history, printed the way the
//! window lays them out.

use crate::client::Backend;
use crate::commands::http_backend;
use crate::config::Config;
use crate::error::Result;
use crate::output::{print_header, print_status};
use crate::refresh::Update;
use crate::ui::shared::Dashboard;
use chrono::Utc;

/// Fetch and print the current state.
///
/// Unlike the window, a failed request is an error here: there is no previous
/// state to fall back on.
pub fn status_command(config: &Config) -> Result<()> {
    let backend = http_backend(config)?;
    let dashboard = load_dashboard(config, &backend)?;
    let now = Utc::now();
    print_header();
    print_status(
        &dashboard.active_labels(now),
        dashboard.is_running(),
        dashboard.rows(),
    );
    Ok(())
}

/// Fetch both endpoints into a fresh dashboard, failing on the first error.
pub(crate) fn load_dashboard(config: &Config, backend: &dyn Backend) -> Result<Dashboard> {
    let active = backend.active_interval()?;
    let sessions = backend.sessions()?;

    let now = Utc::now();
    let mut dashboard = Dashboard::new(config.time_format(), config.reconcile);
    dashboard.apply(Update::ActiveInterval(active), now);
    dashboard.apply(Update::Sessions(sessions), now);
    Ok(dashboard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refresh::tests::FakeBackend;
    use crate::session::Session;

    #[test]
    fn test_load_dashboard() {
        let backend = FakeBackend::default();
        {
            let mut state = backend.state.lock().unwrap();
            state.active = Some(Utc::now());
            state.sessions = vec![Session::new(Utc::now(), Utc::now())];
        }

        let dashboard = load_dashboard(&Config::default(), &backend).unwrap();

        assert!(dashboard.is_running());
        assert_eq!(dashboard.rows().len(), 1);
    }

    #[test]
    fn test_load_dashboard_fails_on_backend_error() {
        let backend = FakeBackend::default();
        backend.state.lock().unwrap().fail_sessions = true;

        assert!(load_dashboard(&Config::default(), &backend).is_err());
    }
}
