//! GUI application entry point.
//!
//! The window shows the running session at the top, the session history in
//! the middle and the refresh status at the bottom. All backend traffic
//! happens on the refresh worker; the window only drains its update channel
//! once per frame.

use crate::client::Backend;
use crate::config::Config;
use crate::error::{GordaError, Result};
use crate::refresh::{RefreshWorker, Update};
use crate::ui::gui::components::{session_row, Indicator, StatusDot};
use crate::ui::gui::theme::{self, colors, rounding, spacing};
use crate::ui::shared::Dashboard;
use chrono::Utc;
use eframe::egui::{self, RichText, Rounding, Stroke};
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

/// Elapsed time is shown to the minute, so repainting more often than this is wasted.
const MAX_REPAINT_INTERVAL: Duration = Duration::from_secs(30);

/// The main GUI application state.
pub struct GordaApp {
    dashboard: Dashboard,
    /// Updates posted by the refresh worker.
    updates: Receiver<Update>,
    /// `None` only in tests that feed the channel directly.
    worker: Option<RefreshWorker>,
    refresh_interval: Duration,
}

impl GordaApp {
    /// Create the app and start polling `backend`.
    ///
    /// The worker wakes `ctx` whenever it posts updates so the window repaints
    /// without waiting for input.
    pub fn new(config: &Config, backend: Box<dyn Backend>, ctx: egui::Context) -> Self {
        let (tx, rx) = mpsc::channel();
        let worker = RefreshWorker::spawn(
            backend,
            config.refresh_interval(),
            tx,
            Box::new(move || ctx.request_repaint()),
        );
        Self {
            dashboard: Dashboard::new(config.time_format(), config.reconcile),
            updates: rx,
            worker: Some(worker),
            refresh_interval: config.refresh_interval(),
        }
    }

    #[cfg(test)]
    fn detached(config: &Config, updates: Receiver<Update>) -> Self {
        Self {
            dashboard: Dashboard::new(config.time_format(), config.reconcile),
            updates,
            worker: None,
            refresh_interval: config.refresh_interval(),
        }
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    /// How long the window may sleep before it must redraw the elapsed time.
    pub fn repaint_interval(&self) -> Duration {
        self.refresh_interval.min(MAX_REPAINT_INTERVAL)
    }

    /// Apply everything the worker has posted since the last frame.
    fn poll_updates(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(update) = self.updates.try_recv() {
            self.dashboard.apply(update, Utc::now());
            applied += 1;
        }
        applied
    }

    fn start_session(&self) {
        if let Some(worker) = &self.worker {
            if !worker.start_session() {
                tracing::error!(event = "gui.worker_gone", action = "start");
            }
        }
    }

    fn stop_session(&self) {
        if let Some(worker) = &self.worker {
            if !worker.stop_session() {
                tracing::error!(event = "gui.worker_gone", action = "stop");
            }
        }
    }

    fn refresh_now(&self) {
        if let Some(worker) = &self.worker {
            worker.refresh();
        }
    }
}

impl eframe::App for GordaApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_updates();

        // Keep the elapsed label moving even when nothing arrives
        ctx.request_repaint_after(self.repaint_interval());

        if ctx.input(|i| i.key_pressed(egui::Key::F5)) {
            self.refresh_now();
        }

        egui::TopBottomPanel::top("active_session")
            .frame(
                egui::Frame::none()
                    .fill(colors::BACKGROUND)
                    .inner_margin(egui::Margin::same(spacing::LG)),
            )
            .show(ctx, |ui| {
                self.render_active_session(ui);
            });

        egui::TopBottomPanel::bottom("status_footer")
            .frame(
                egui::Frame::none()
                    .fill(colors::BACKGROUND)
                    .inner_margin(egui::Margin::symmetric(spacing::LG, spacing::SM))
                    .stroke(Stroke::new(1.0, colors::SEPARATOR)),
            )
            .show(ctx, |ui| {
                self.render_footer(ui);
            });

        egui::CentralPanel::default()
            .frame(
                egui::Frame::none()
                    .fill(colors::BACKGROUND)
                    .inner_margin(egui::Margin::symmetric(spacing::LG, spacing::SM)),
            )
            .show(ctx, |ui| {
                self.render_history(ui);
            });
    }
}

impl GordaApp {
    /// Start/Stop buttons and the two active-session labels.
    fn render_active_session(&mut self, ui: &mut egui::Ui) {
        let labels = self.dashboard.active_labels(Utc::now());
        let indicator = Indicator::from_dashboard(&self.dashboard);

        ui.horizontal(|ui| {
            if ui.button("Start").clicked() {
                self.start_session();
            }
            if ui.button("Stop").clicked() {
                self.stop_session();
            }

            ui.add_space(spacing::MD);
            StatusDot::new(indicator)
                .show(ui)
                .on_hover_text(indicator.tooltip());
            ui.label(
                RichText::new(&labels.session)
                    .strong()
                    .color(colors::TEXT_PRIMARY),
            );
            if !labels.duration.is_empty() {
                ui.label(RichText::new(&labels.duration).color(colors::TEXT_SECONDARY));
            }
        });
    }

    /// Scrollable session history.
    fn render_history(&self, ui: &mut egui::Ui) {
        egui::Frame::none()
            .fill(colors::SURFACE)
            .rounding(Rounding::same(rounding::CARD))
            .stroke(Stroke::new(1.0, colors::BORDER))
            .inner_margin(egui::Margin::same(spacing::MD))
            .show(ui, |ui| {
                ui.set_min_size(ui.available_size());

                let rows = self.dashboard.rows();
                if rows.is_empty() {
                    ui.label(RichText::new("No sessions yet").color(colors::TEXT_MUTED));
                    return;
                }

                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        for row in rows {
                            session_row(ui, row);
                        }
                    });
            });
    }

    /// Last update time and, when the backend is failing, why.
    fn render_footer(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(
                RichText::new(self.dashboard.last_update_label())
                    .small()
                    .color(colors::TEXT_MUTED),
            );
            if let Some(error) = self.dashboard.error_line() {
                ui.separator();
                ui.label(RichText::new(error).small().color(colors::STATUS_ERROR));
            }
        });
    }
}

/// Build the viewport configuration from the user's window settings.
fn build_viewport(config: &Config) -> egui::ViewportBuilder {
    egui::ViewportBuilder::default()
        .with_title(config.window_title.clone())
        .with_inner_size([config.window_width, config.window_height])
        .with_min_inner_size([config.min_window_width, config.min_window_height])
}

/// Open the tracker window and block until it is closed.
///
/// # Returns
///
/// * `Ok(())` when the user closes the window
/// * `Err(GordaError::Gui)` if the window cannot be created
pub fn run_gui(config: Config, backend: Box<dyn Backend>) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: build_viewport(&config),
        ..Default::default()
    };
    let app_name = config.window_title.clone();

    tracing::info!(event = "gui.started", backend = %config.backend_url);

    eframe::run_native(
        &app_name,
        options,
        Box::new(move |cc| {
            theme::init(&cc.egui_ctx);
            Ok(Box::new(GordaApp::new(&config, backend, cc.egui_ctx.clone())))
        }),
    )
    .map_err(|e| GordaError::Gui(e.to_string()))
}
