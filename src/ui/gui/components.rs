//! Reusable widgets for the tracker window.

use crate::reconcile::SessionRow;
use crate::ui::gui::theme::{colors, spacing};
use crate::ui::shared::Dashboard;
use eframe::egui::{self, Color32, Pos2, RichText, Sense, TextStyle, Vec2};

/// Width of the duration column, in digit widths.
pub const DURATION_COLUMN_CHARS: usize = 20;

/// Default radius for the status indicator dot.
pub const STATUS_DOT_RADIUS: f32 = 5.0;

// ============================================================================
// Status indicator
// ============================================================================

/// What the indicator dot next to the session label shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    Running,
    Idle,
    /// The last fetch failed; the labels may be stale.
    Offline,
}

impl Indicator {
    pub fn from_dashboard(dashboard: &Dashboard) -> Self {
        if dashboard.is_offline() {
            Indicator::Offline
        } else if dashboard.is_running() {
            Indicator::Running
        } else {
            Indicator::Idle
        }
    }

    pub fn color(self) -> Color32 {
        match self {
            Indicator::Running => colors::STATUS_RUNNING,
            Indicator::Idle => colors::STATUS_IDLE,
            Indicator::Offline => colors::STATUS_ERROR,
        }
    }

    pub fn tooltip(self) -> &'static str {
        match self {
            Indicator::Running => "Session running",
            Indicator::Idle => "No session running",
            Indicator::Offline => "Backend unavailable",
        }
    }
}

/// A small filled circle in the indicator's color.
#[derive(Debug, Clone, Copy)]
pub struct StatusDot {
    color: Color32,
    radius: f32,
}

impl StatusDot {
    pub fn new(indicator: Indicator) -> Self {
        Self {
            color: indicator.color(),
            radius: STATUS_DOT_RADIUS,
        }
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    /// Paint the dot at the given center position.
    pub fn paint(&self, painter: &egui::Painter, center: Pos2) {
        painter.circle_filled(center, self.radius, self.color);
    }

    /// Allocate space in the layout and paint the dot there.
    pub fn show(&self, ui: &mut egui::Ui) -> egui::Response {
        let size = Vec2::splat(self.radius * 2.0);
        let (rect, response) = ui.allocate_exact_size(size, Sense::hover());
        self.paint(ui.painter(), rect.center());
        response
    }
}

// ============================================================================
// History rows
// ============================================================================

/// Pixel width of the duration column for the current body font.
fn duration_column_width(ui: &egui::Ui) -> f32 {
    let font = TextStyle::Body.resolve(ui.style());
    let digit = ui.fonts(|f| f.glyph_width(&font, '0'));
    digit * DURATION_COLUMN_CHARS as f32
}

/// One history row: start | end | duration.
///
/// The row's widget id is derived from its `row_id`, so rows that survive a
/// refresh keep their egui state.
pub fn session_row(ui: &mut egui::Ui, row: &SessionRow) {
    ui.push_id(row.row_id, |ui| {
        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = spacing::SM;
            ui.label(RichText::new(&row.labels.start).color(colors::TEXT_PRIMARY));
            ui.separator();
            ui.label(RichText::new(&row.labels.end).color(colors::TEXT_PRIMARY));
            ui.separator();
            let width = duration_column_width(ui);
            ui.add_sized(
                [width, ui.spacing().interact_size.y],
                egui::Label::new(RichText::new(&row.labels.duration).color(colors::TEXT_SECONDARY)),
            );
        });
    });
}
