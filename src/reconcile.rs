//! Keeps the displayed history rows in step with the backend's session list.
//!
//! When every fetched session carries an identifier, rows are matched by it:
//! stale rows are dropped, new rows are inserted at the fetched position and
//! rows that are still present are left alone, so the widgets behind them keep
//! their identity (scroll position, hover state) across refreshes. Lists
//! without identifiers are torn down and rebuilt.

use std::collections::HashSet;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::format::{row_labels, RowLabels, TimeFormat};
use crate::session::Session;

static NEXT_ROW_ID: AtomicU64 = AtomicU64::new(1);

fn next_row_id() -> u64 {
    NEXT_ROW_ID.fetch_add(1, Ordering::Relaxed)
}

/// How fetched sessions are applied to the displayed rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReconcileMode {
    /// Match rows by session id when every session has one, otherwise rebuild.
    #[default]
    Auto,
    /// Always discard and recreate every row.
    Rebuild,
}

impl ReconcileMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ReconcileMode::Auto => "auto",
            ReconcileMode::Rebuild => "rebuild",
        }
    }
}

impl FromStr for ReconcileMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(ReconcileMode::Auto),
            "rebuild" => Ok(ReconcileMode::Rebuild),
            other => Err(format!(
                "unknown reconcile mode '{}', expected 'auto' or 'rebuild'",
                other
            )),
        }
    }
}

/// One displayed history row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRow {
    /// Process-unique widget identity. Never reused.
    pub row_id: u64,
    /// Session id this row was built from, if any.
    pub key: Option<Uuid>,
    pub labels: RowLabels,
}

impl SessionRow {
    fn build(session: &Session, format: &TimeFormat) -> Self {
        Self {
            row_id: next_row_id(),
            key: session.key(),
            labels: row_labels(session, format),
        }
    }
}

/// What a reconcile pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcileOutcome {
    pub added: usize,
    pub removed: usize,
    pub kept: usize,
    pub rebuilt: bool,
}

impl ReconcileOutcome {
    pub fn is_noop(&self) -> bool {
        self.added == 0 && self.removed == 0
    }
}

/// The displayed history list.
#[derive(Debug, Clone, Default)]
pub struct SessionList {
    rows: Vec<SessionRow>,
    mode: ReconcileMode,
}

impl SessionList {
    pub fn new(mode: ReconcileMode) -> Self {
        Self {
            rows: Vec::new(),
            mode,
        }
    }

    pub fn rows(&self) -> &[SessionRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn mode(&self) -> ReconcileMode {
        self.mode
    }

    /// Apply a freshly fetched session list.
    pub fn reconcile(&mut self, sessions: &[Session], format: &TimeFormat) -> ReconcileOutcome {
        let keyed = self.mode == ReconcileMode::Auto
            && sessions.iter().all(|s| s.key().is_some())
            && self.rows.iter().all(|r| r.key.is_some());

        if keyed {
            self.reconcile_keyed(sessions, format)
        } else {
            self.rebuild(sessions, format)
        }
    }

    fn reconcile_keyed(&mut self, sessions: &[Session], format: &TimeFormat) -> ReconcileOutcome {
        let fetched: HashSet<Uuid> = sessions.iter().filter_map(Session::key).collect();

        let before = self.rows.len();
        self.rows
            .retain(|row| row.key.is_some_and(|key| fetched.contains(&key)));
        let removed = before - self.rows.len();
        let kept = self.rows.len();

        let displayed: HashSet<Uuid> = self.rows.iter().filter_map(|r| r.key).collect();
        let mut seen = HashSet::new();
        let mut added = 0;
        // Output position, advanced once per distinct key
        let mut position = 0;
        for session in sessions {
            let Some(key) = session.key() else { continue };
            if !seen.insert(key) {
                continue;
            }
            if !displayed.contains(&key) {
                let at = position.min(self.rows.len());
                self.rows.insert(at, SessionRow::build(session, format));
                added += 1;
            }
            position += 1;
        }

        ReconcileOutcome {
            added,
            removed,
            kept,
            rebuilt: false,
        }
    }

    fn rebuild(&mut self, sessions: &[Session], format: &TimeFormat) -> ReconcileOutcome {
        let removed = self.rows.len();
        self.rows = sessions
            .iter()
            .map(|s| SessionRow::build(s, format))
            .collect();
        ReconcileOutcome {
            added: self.rows.len(),
            removed,
            kept: 0,
            rebuilt: true,
        }
    }
}
