//! Background polling of the backend.
//!
//! A worker thread owns the [`Backend`] and refreshes on a fixed interval or
//! when asked. Results travel back to the UI over a channel, the same way the
//! window receives command output elsewhere; a wake callback lets the UI
//! repaint as soon as something arrives. Failures are logged and reported but
//! never carry data, so whatever the UI last showed stays on screen.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::client::Backend;
use crate::session::Session;

/// Default polling interval.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5);

/// Requests sent to the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Refresh,
    Start,
    Stop,
    Shutdown,
}

/// Backend operations, used to attribute failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Operation {
    ActiveInterval,
    Sessions,
    Start,
    Stop,
}

impl Operation {
    pub fn label(self) -> &'static str {
        match self {
            Operation::ActiveInterval => "active interval",
            Operation::Sessions => "sessions",
            Operation::Start => "start",
            Operation::Stop => "stop",
        }
    }
}

/// Results posted back by the worker.
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    ActiveInterval(Option<DateTime<Utc>>),
    Sessions(Vec<Session>),
    /// A start or stop call went through.
    Completed(Operation),
    Failed {
        operation: Operation,
        message: String,
    },
}

/// Called after the worker posts updates.
pub type Waker = Box<dyn Fn() + Send>;

/// Fetch the active interval and the session list once.
///
/// The two fetches are independent: one failing does not suppress the other.
pub fn fetch_updates(backend: &dyn Backend) -> Vec<Update> {
    let active = match backend.active_interval() {
        Ok(active) => Update::ActiveInterval(active),
        Err(e) => {
            tracing::warn!(event = "refresh.active_failed", error = %e);
            Update::Failed {
                operation: Operation::ActiveInterval,
                message: e.to_string(),
            }
        }
    };

    let sessions = match backend.sessions() {
        Ok(sessions) => {
            tracing::debug!(event = "refresh.sessions_fetched", count = sessions.len());
            Update::Sessions(sessions)
        }
        Err(e) => {
            tracing::warn!(event = "refresh.sessions_failed", error = %e);
            Update::Failed {
                operation: Operation::Sessions,
                message: e.to_string(),
            }
        }
    };

    vec![active, sessions]
}

/// Run a start or stop call, returning the update describing its result.
fn act(backend: &dyn Backend, operation: Operation) -> Update {
    let result = match operation {
        Operation::Start => backend.start(),
        Operation::Stop => backend.stop(),
        Operation::ActiveInterval | Operation::Sessions => Ok(()),
    };
    match result {
        Ok(()) => {
            tracing::info!(event = "refresh.action_completed", action = operation.label());
            Update::Completed(operation)
        }
        Err(e) => {
            tracing::warn!(event = "refresh.action_failed", action = operation.label(), error = %e);
            Update::Failed {
                operation,
                message: e.to_string(),
            }
        }
    }
}

/// Handle to the polling thread.
///
/// Dropping it asks the thread to stop without waiting: a request already in
/// flight finishes in the background. Use [`RefreshWorker::join`] to wait.
pub struct RefreshWorker {
    commands: Sender<Command>,
    handle: Option<JoinHandle<()>>,
}

impl RefreshWorker {
    /// Spawn the worker. It refreshes immediately, then every `interval`.
    pub fn spawn(
        backend: Box<dyn Backend>,
        interval: Duration,
        updates: Sender<Update>,
        wake: Waker,
    ) -> Self {
        let (commands, rx) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("gorda-refresh".to_string())
            .spawn(move || run_worker(backend, interval, rx, updates, wake))
            .ok();

        if handle.is_none() {
            tracing::error!(event = "refresh.spawn_failed");
        }

        Self { commands, handle }
    }

    /// Queue a command. Returns false when the worker has exited.
    pub fn send(&self, command: Command) -> bool {
        self.commands.send(command).is_ok()
    }

    pub fn refresh(&self) -> bool {
        self.send(Command::Refresh)
    }

    pub fn start_session(&self) -> bool {
        self.send(Command::Start)
    }

    pub fn stop_session(&self) -> bool {
        self.send(Command::Stop)
    }

    /// Stop the worker and wait for its current request to finish.
    pub fn join(mut self) {
        let _ = self.commands.send(Command::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for RefreshWorker {
    fn drop(&mut self) {
        let _ = self.commands.send(Command::Shutdown);
    }
}

fn run_worker(
    backend: Box<dyn Backend>,
    interval: Duration,
    commands: Receiver<Command>,
    updates: Sender<Update>,
    wake: Waker,
) {
    tracing::info!(event = "refresh.worker_started", interval_ms = interval.as_millis() as u64);

    let post = |batch: Vec<Update>| -> bool {
        for update in batch {
            if updates.send(update).is_err() {
                return false;
            }
        }
        wake();
        true
    };

    let mut running = post(fetch_updates(backend.as_ref()));

    while running {
        let batch = match commands.recv_timeout(interval) {
            Ok(Command::Refresh) | Err(RecvTimeoutError::Timeout) => fetch_updates(backend.as_ref()),
            Ok(Command::Start) => {
                let mut batch = vec![act(backend.as_ref(), Operation::Start)];
                batch.extend(fetch_updates(backend.as_ref()));
                batch
            }
            Ok(Command::Stop) => {
                let mut batch = vec![act(backend.as_ref(), Operation::Stop)];
                batch.extend(fetch_updates(backend.as_ref()));
                batch
            }
            Ok(Command::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
        };
        running = post(batch);
    }

    tracing::info!(event = "refresh.worker_stopped");
}
