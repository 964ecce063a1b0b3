//! Watch TUI Application
//!
//! Full-screen terminal view of the same dashboard the window shows, driven
//! by the same refresh worker.

use crate::client::Backend;
use crate::config::Config;
use crate::error::{GordaError, Result};
use crate::refresh::{Command, RefreshWorker, Update};
use crate::ui::shared::Dashboard;
use chrono::{DateTime, Utc};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame, Terminal,
};
use std::io::{self, Stdout};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::time::Duration;

/// Cyan - headers and highlights
const COLOR_PRIMARY: Color = Color::Cyan;
/// Green - a session is running
const COLOR_SUCCESS: Color = Color::Green;
/// Red - backend failures
const COLOR_ERROR: Color = Color::Red;
/// Gray - secondary text
const COLOR_DIM: Color = Color::DarkGray;

/// How long to wait for a key before checking the worker again.
const POLL_DURATION: Duration = Duration::from_millis(100);

/// What a key press asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Send(Command),
    Quit,
    None,
}

/// Map a key to an action. Unknown keys do nothing.
pub fn key_action(key: KeyCode) -> KeyAction {
    match key {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,
        KeyCode::Char('s') | KeyCode::Char('S') => KeyAction::Send(Command::Start),
        KeyCode::Char('x') | KeyCode::Char('X') => KeyAction::Send(Command::Stop),
        KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::F(5) => {
            KeyAction::Send(Command::Refresh)
        }
        _ => KeyAction::None,
    }
}

/// State of the watch view.
pub struct WatchApp {
    dashboard: Dashboard,
    updates: Receiver<Update>,
    should_quit: bool,
}

impl WatchApp {
    pub fn new(dashboard: Dashboard, updates: Receiver<Update>) -> Self {
        Self {
            dashboard,
            updates,
            should_quit: false,
        }
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Apply queued worker updates.
    pub fn poll_updates(&mut self, now: DateTime<Utc>) {
        while let Ok(update) = self.updates.try_recv() {
            self.dashboard.apply(update, now);
        }
    }

    /// Handle a key, forwarding commands to the worker.
    pub fn handle_key(&mut self, key: KeyCode, worker: &RefreshWorker) {
        match key_action(key) {
            KeyAction::Quit => self.should_quit = true,
            KeyAction::Send(command) => {
                if !worker.send(command) {
                    self.should_quit = true;
                }
            }
            KeyAction::None => {}
        }
    }

    pub fn render(&self, frame: &mut Frame, now: DateTime<Utc>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4), // Active session
                Constraint::Min(0),    // History
                Constraint::Length(1), // Footer
            ])
            .split(frame.area());

        self.render_active(frame, chunks[0], now);
        self.render_history(frame, chunks[1]);
        self.render_footer(frame, chunks[2]);
    }

    fn render_active(&self, frame: &mut Frame, area: Rect, now: DateTime<Utc>) {
        let labels = self.dashboard.active_labels(now);
        let session_color = if self.dashboard.is_running() {
            COLOR_SUCCESS
        } else {
            Color::White
        };

        let lines = vec![
            Line::from(Span::styled(
                labels.session,
                Style::default()
                    .fg(session_color)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::raw(labels.duration)),
        ];

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" gorda ")
            .border_style(Style::default().fg(COLOR_PRIMARY));
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_history(&self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .dashboard
            .rows()
            .iter()
            .map(|row| {
                ListItem::new(Line::from(vec![
                    Span::raw(row.labels.start.clone()),
                    Span::styled(" │ ", Style::default().fg(COLOR_DIM)),
                    Span::raw(row.labels.end.clone()),
                    Span::styled(" │ ", Style::default().fg(COLOR_DIM)),
                    Span::raw(row.labels.duration.clone()),
                ]))
            })
            .collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Sessions ")
            .border_style(Style::default().fg(COLOR_DIM));

        if items.is_empty() {
            let empty = Paragraph::new(Span::styled(
                "No sessions yet",
                Style::default().fg(COLOR_DIM),
            ))
            .block(block);
            frame.render_widget(empty, area);
        } else {
            frame.render_widget(List::new(items).block(block), area);
        }
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let line = match self.dashboard.error_line() {
            Some(error) => Line::from(Span::styled(error, Style::default().fg(COLOR_ERROR))),
            None => Line::from(vec![
                Span::styled(
                    self.dashboard.last_update_label(),
                    Style::default().fg(COLOR_DIM),
                ),
                Span::styled(
                    "  s start · x stop · r refresh · q quit",
                    Style::default().fg(COLOR_DIM),
                ),
            ]),
        };
        frame.render_widget(Paragraph::new(line), area);
    }
}

type PanicHook = Box<dyn Fn(&std::panic::PanicHookInfo<'_>) + Sync + Send + 'static>;

/// The panic hook that was active before [`install_panic_hook`].
struct SavedHook(Arc<PanicHook>);

/// Run `teardown` before the current panic hook until [`restore_panic_hook`].
fn install_panic_hook(teardown: fn()) -> SavedHook {
    let original: Arc<PanicHook> = Arc::new(std::panic::take_hook());
    let chained = Arc::clone(&original);
    std::panic::set_hook(Box::new(move |panic_info| {
        teardown();
        (**chained)(panic_info);
    }));
    SavedHook(original)
}

fn restore_panic_hook(saved: SavedHook) {
    let _ = std::panic::take_hook();
    let original = saved.0;
    std::panic::set_hook(Box::new(move |panic_info| (**original)(panic_info)));
}

/// Best-effort terminal reset for the panic path.
fn reset_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

/// Initialize the terminal for TUI mode. Raw mode is undone if any later step fails.
fn init_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(e);
    }
    match Terminal::new(CrosstermBackend::new(stdout)) {
        Ok(terminal) => Ok(terminal),
        Err(e) => {
            reset_terminal();
            Err(e)
        }
    }
}

/// Restore the terminal to normal mode.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the watch view until the user quits.
pub fn run_watch(config: &Config, backend: Box<dyn Backend>) -> Result<()> {
    let (tx, rx) = mpsc::channel();
    let worker = RefreshWorker::spawn(backend, config.refresh_interval(), tx, Box::new(|| {}));
    let mut app = WatchApp::new(Dashboard::new(config.time_format(), config.reconcile), rx);

    // Restore the terminal if anything panics while in raw mode
    let saved_hook = install_panic_hook(reset_terminal);
    let result = init_terminal().map_err(GordaError::from).and_then(|mut terminal| {
        let result = event_loop(&mut terminal, &mut app, &worker);
        restore_terminal(&mut terminal)?;
        result
    });
    restore_panic_hook(saved_hook);
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut WatchApp,
    worker: &RefreshWorker,
) -> Result<()> {
    loop {
        let now = Utc::now();
        app.poll_updates(now);
        terminal.draw(|frame| app.render(frame, now))?;

        if event::poll(POLL_DURATION)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (not release or repeat)
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key.code, worker);
                }
            }
        }

        if app.should_quit() {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::TimeFormat;
    use crate::reconcile::ReconcileMode;
    use crate::session::Session;
    use chrono::{FixedOffset, TimeZone};
    use ratatui::backend::TestBackend;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    fn app() -> (mpsc::Sender<Update>, WatchApp) {
        let (tx, rx) = mpsc::channel();
        let dashboard = Dashboard::new(
            TimeFormat::fixed("%H:%M", FixedOffset::east_opt(0).unwrap()),
            ReconcileMode::Auto,
        );
        (tx, WatchApp::new(dashboard, rx))
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    static TEARDOWNS: AtomicUsize = AtomicUsize::new(0);
    static ORIGINAL_CALLS: AtomicUsize = AtomicUsize::new(0);

    fn count_teardown() {
        TEARDOWNS.fetch_add(1, Ordering::SeqCst);
    }

    #[test]
    fn test_panic_hook_restored_after_watch() {
        std::panic::set_hook(Box::new(|_| {
            ORIGINAL_CALLS.fetch_add(1, Ordering::SeqCst);
        }));

        let saved = install_panic_hook(count_teardown);
        let _ = std::panic::catch_unwind(|| panic!("while watching"));
        assert_eq!(TEARDOWNS.load(Ordering::SeqCst), 1);
        assert_eq!(ORIGINAL_CALLS.load(Ordering::SeqCst), 1);

        restore_panic_hook(saved);
        let _ = std::panic::catch_unwind(|| panic!("after watching"));
        assert_eq!(TEARDOWNS.load(Ordering::SeqCst), 1);
        assert_eq!(ORIGINAL_CALLS.load(Ordering::SeqCst), 2);

        let _ = std::panic::take_hook();
    }

    #[test]
    fn test_key_actions() {
        assert_eq!(key_action(KeyCode::Char('q')), KeyAction::Quit);
        assert_eq!(key_action(KeyCode::Esc), KeyAction::Quit);
        assert_eq!(key_action(KeyCode::Char('s')), KeyAction::Send(Command::Start));
        assert_eq!(key_action(KeyCode::Char('x')), KeyAction::Send(Command::Stop));
        assert_eq!(key_action(KeyCode::Char('r')), KeyAction::Send(Command::Refresh));
        assert_eq!(key_action(KeyCode::Char('z')), KeyAction::None);
    }

    #[test]
    fn test_render_active_and_rows() {
        let (tx, mut app) = app();
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 45, 0).unwrap();
        tx.send(Update::ActiveInterval(Some(start))).unwrap();
        tx.send(Update::Sessions(vec![Session::new(
            Utc.with_ymd_and_hms(2024, 3, 1, 7, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap(),
        )
        .with_id(Uuid::from_u128(1))]))
        .unwrap();
        app.poll_updates(now);

        let mut terminal = Terminal::new(TestBackend::new(80, 12)).unwrap();
        terminal.draw(|frame| app.render(frame, now)).unwrap();
        let text = buffer_text(&terminal);

        assert!(text.contains("Started: 09:00"));
        assert!(text.contains("Duration: 45m0s"));
        assert!(text.contains("Start: 07:00"));
        assert!(text.contains("Duration: 1h30m0s"));
    }

    #[test]
    fn test_render_error_footer() {
        let (tx, mut app) = app();
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        tx.send(Update::Failed {
            operation: crate::refresh::Operation::Sessions,
            message: "refused".to_string(),
        })
        .unwrap();
        app.poll_updates(now);

        let mut terminal = Terminal::new(TestBackend::new(80, 8)).unwrap();
        terminal.draw(|frame| app.render(frame, now)).unwrap();

        assert!(buffer_text(&terminal).contains("sessions: refused"));
    }
}
