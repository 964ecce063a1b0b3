//! State shared by the GUI and the terminal view.
//!
//! [`Dashboard`] is the single place where worker updates are folded into
//! what gets drawn. Both front-ends own one and feed it every [`Update`] they
//! receive.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::format::{active_labels, ActiveLabels, TimeFormat};
use crate::reconcile::{ReconcileMode, SessionList, SessionRow};
use crate::refresh::{Operation, Update};

/// Shown in the session label until the first active-interval response.
pub const LOADING_LABEL: &str = "Loading…";

/// Successful active-interval fetches a start/stop failure stays visible for.
/// The first arrives in the same batch as the failure itself.
const ACTION_ERROR_REFRESHES: u32 = 2;

#[derive(Debug, Clone)]
struct ErrorEntry {
    message: String,
    refreshes_since: u32,
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    format: TimeFormat,
    /// `None` until the backend has answered once.
    active: Option<Option<DateTime<Utc>>>,
    sessions: SessionList,
    errors: BTreeMap<Operation, ErrorEntry>,
    last_update: Option<DateTime<Utc>>,
}

impl Dashboard {
    pub fn new(format: TimeFormat, mode: ReconcileMode) -> Self {
        Self {
            format,
            active: None,
            sessions: SessionList::new(mode),
            errors: BTreeMap::new(),
            last_update: None,
        }
    }

    /// Fold one worker update into the view state.
    pub fn apply(&mut self, update: Update, now: DateTime<Utc>) {
        match update {
            Update::ActiveInterval(active) => {
                self.active = Some(active);
                self.errors.remove(&Operation::ActiveInterval);
                self.age_action_errors();
                self.last_update = Some(now);
            }
            Update::Sessions(sessions) => {
                let outcome = self.sessions.reconcile(&sessions, &self.format);
                if !outcome.is_noop() {
                    tracing::debug!(
                        event = "refresh.sessions_reconciled",
                        added = outcome.added,
                        removed = outcome.removed,
                        kept = outcome.kept,
                        rebuilt = outcome.rebuilt
                    );
                }
                self.errors.remove(&Operation::Sessions);
                self.last_update = Some(now);
            }
            Update::Completed(operation) => {
                self.errors.remove(&operation);
            }
            Update::Failed { operation, message } => {
                self.errors.insert(
                    operation,
                    ErrorEntry {
                        message,
                        refreshes_since: 0,
                    },
                );
            }
        }
    }

    /// Start/stop failures fade once later refreshes have gone through.
    fn age_action_errors(&mut self) {
        self.errors.retain(|operation, entry| {
            if !matches!(operation, Operation::Start | Operation::Stop) {
                return true;
            }
            entry.refreshes_since += 1;
            entry.refreshes_since < ACTION_ERROR_REFRESHES
        });
    }

    /// Whether the last fetch of either endpoint failed.
    pub fn is_offline(&self) -> bool {
        self.errors.contains_key(&Operation::ActiveInterval)
            || self.errors.contains_key(&Operation::Sessions)
    }

    pub fn is_loaded(&self) -> bool {
        self.active.is_some()
    }

    /// Whether a session is running, as of the last successful fetch.
    pub fn is_running(&self) -> bool {
        matches!(self.active, Some(Some(_)))
    }

    /// Labels for the running session, elapsed time measured at `now`.
    pub fn active_labels(&self, now: DateTime<Utc>) -> ActiveLabels {
        match self.active {
            Some(active) => active_labels(active, now, &self.format),
            None => ActiveLabels {
                session: LOADING_LABEL.to_string(),
                duration: String::new(),
            },
        }
    }

    pub fn rows(&self) -> &[SessionRow] {
        self.sessions.rows()
    }

    /// Most recent failures, one per operation, in a stable order.
    pub fn errors(&self) -> impl Iterator<Item = (Operation, &str)> {
        self.errors
            .iter()
            .map(|(op, entry)| (*op, entry.message.as_str()))
    }

    /// One-line summary of the current failures, if any.
    pub fn error_line(&self) -> Option<String> {
        if self.errors.is_empty() {
            return None;
        }
        Some(
            self.errors()
                .map(|(op, msg)| format!("{}: {}", op.label(), msg))
                .collect::<Vec<_>>()
                .join(" · "),
        )
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }

    /// "Updated 09:41" style footer text.
    pub fn last_update_label(&self) -> String {
        match self.last_update {
            Some(at) => format!("Updated {}", self.format.clock(at)),
            None => "Not updated yet".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;
    use chrono::{FixedOffset, TimeZone};
    use uuid::Uuid;

    fn ts(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, h, m, 0).unwrap()
    }

    fn dashboard() -> Dashboard {
        Dashboard::new(
            TimeFormat::fixed("%H:%M", FixedOffset::east_opt(0).unwrap()),
            ReconcileMode::Auto,
        )
    }

    fn keyed(n: u128) -> Session {
        Session::new(ts(8, 0), ts(9, 0)).with_id(Uuid::from_u128(n))
    }

    #[test]
    fn test_loading_before_first_response() {
        let d = dashboard();
        assert!(!d.is_loaded());
        assert_eq!(d.active_labels(ts(9, 0)).session, LOADING_LABEL);
        assert_eq!(d.last_update_label(), "Not updated yet");
    }

    #[test]
    fn test_active_interval_update() {
        let mut d = dashboard();
        d.apply(Update::ActiveInterval(Some(ts(9, 0))), ts(9, 30));

        assert!(d.is_running());
        let labels = d.active_labels(ts(9, 30));
        assert_eq!(labels.session, "Started: 09:00");
        assert_eq!(labels.duration, "Duration: 30m0s");
        assert_eq!(d.last_update_label(), "Updated 09:30");
    }

    #[test]
    fn test_idle_active_interval() {
        let mut d = dashboard();
        d.apply(Update::ActiveInterval(None), ts(9, 30));
        assert!(d.is_loaded());
        assert!(!d.is_running());
        assert_eq!(d.active_labels(ts(9, 30)).session, "No active interval");
    }

    #[test]
    fn test_failure_keeps_previous_state() {
        let mut d = dashboard();
        d.apply(Update::ActiveInterval(Some(ts(9, 0))), ts(9, 5));
        d.apply(Update::Sessions(vec![keyed(1), keyed(2)]), ts(9, 5));
        let rows_before: Vec<u64> = d.rows().iter().map(|r| r.row_id).collect();

        d.apply(
            Update::Failed {
                operation: Operation::Sessions,
                message: "connection refused".to_string(),
            },
            ts(9, 10),
        );
        d.apply(
            Update::Failed {
                operation: Operation::ActiveInterval,
                message: "connection refused".to_string(),
            },
            ts(9, 10),
        );

        assert!(d.is_running());
        assert_eq!(d.rows().iter().map(|r| r.row_id).collect::<Vec<_>>(), rows_before);
        assert_eq!(d.last_update(), Some(ts(9, 5)));
        assert_eq!(
            d.error_line().unwrap(),
            "active interval: connection refused · sessions: connection refused"
        );
    }

    #[test]
    fn test_success_clears_matching_error_only() {
        let mut d = dashboard();
        d.apply(
            Update::Failed {
                operation: Operation::Start,
                message: "500".to_string(),
            },
            ts(9, 0),
        );
        d.apply(
            Update::Failed {
                operation: Operation::Sessions,
                message: "timeout".to_string(),
            },
            ts(9, 0),
        );

        d.apply(Update::Sessions(vec![]), ts(9, 1));
        assert_eq!(d.error_line().unwrap(), "start: 500");

        d.apply(Update::Completed(Operation::Start), ts(9, 2));
        assert!(d.error_line().is_none());
    }

    #[test]
    fn test_action_error_fades_after_later_refresh() {
        let mut d = dashboard();
        d.apply(Update::ActiveInterval(None), ts(9, 0));

        // Worker batch: the failed stop, then the refresh that follows it
        d.apply(
            Update::Failed {
                operation: Operation::Stop,
                message: "409".to_string(),
            },
            ts(9, 1),
        );
        d.apply(Update::ActiveInterval(None), ts(9, 1));
        d.apply(Update::Sessions(vec![]), ts(9, 1));
        assert_eq!(d.error_line().unwrap(), "stop: 409");
        assert!(!d.is_offline());

        // Next periodic refresh
        d.apply(Update::ActiveInterval(None), ts(9, 2));
        assert!(d.error_line().is_none());
    }

    #[test]
    fn test_fetch_errors_do_not_fade() {
        let mut d = dashboard();
        d.apply(
            Update::Failed {
                operation: Operation::Sessions,
                message: "timeout".to_string(),
            },
            ts(9, 0),
        );
        for minute in 1..5 {
            d.apply(Update::ActiveInterval(None), ts(9, minute));
        }
        assert!(d.is_offline());
        assert_eq!(d.error_line().unwrap(), "sessions: timeout");
    }

    #[test]
    fn test_sessions_update_reconciles_rows() {
        let mut d = dashboard();
        d.apply(Update::Sessions(vec![keyed(1), keyed(2)]), ts(9, 0));
        let kept = d.rows()[1].row_id;

        d.apply(Update::Sessions(vec![keyed(2)]), ts(9, 5));

        assert_eq!(d.rows().len(), 1);
        assert_eq!(d.rows()[0].row_id, kept);
    }
}
