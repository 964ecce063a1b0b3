//! Theme and color system for the GUI.
//!
//! Warm cream background, white surfaces, and a small set of semantic colors
//! for the running/idle indicator and error text.

use eframe::egui::{self, Color32, Rounding, Stroke, Style, Visuals};

/// Spacing scale for consistent layout throughout the window.
pub mod spacing {
    /// Extra small spacing (4px) - between a label and its separator.
    pub const XS: f32 = 4.0;

    /// Small spacing (8px) - between related elements.
    pub const SM: f32 = 8.0;

    /// Medium spacing (12px) - between sections within a panel.
    pub const MD: f32 = 12.0;

    /// Standard spacing (16px) - panel padding.
    pub const LG: f32 = 16.0;
}

/// Corner rounding values.
pub mod rounding {
    /// Rounding for cards and panels (8px).
    pub const CARD: f32 = 8.0;

    /// Rounding for buttons (4px).
    pub const BUTTON: f32 = 4.0;
}

/// Semantic color palette for the light theme.
pub mod colors {
    use super::Color32;

    /// Window background - warm cream (~#FAF9F7).
    pub const BACKGROUND: Color32 = Color32::from_rgb(250, 249, 247);

    /// Surface color for the history card - white.
    pub const SURFACE: Color32 = Color32::from_rgb(255, 255, 255);

    /// Hover background - warm beige tint.
    pub const SURFACE_HOVER: Color32 = Color32::from_rgb(245, 243, 239);

    /// Pressed/selected background - warm beige.
    pub const SURFACE_SELECTED: Color32 = Color32::from_rgb(238, 235, 229);

    pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(28, 28, 30);
    pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(99, 99, 102);
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(142, 142, 147);

    /// Card borders and separators - warm gray.
    pub const BORDER: Color32 = Color32::from_rgb(232, 229, 222);
    pub const BORDER_FOCUSED: Color32 = Color32::from_rgb(205, 200, 190);
    pub const SEPARATOR: Color32 = Color32::from_rgb(232, 229, 222);

    pub const ACCENT: Color32 = Color32::from_rgb(0, 122, 255);
    pub const ACCENT_SUBTLE: Color32 = Color32::from_rgb(230, 244, 255);

    /// A session is running.
    pub const STATUS_RUNNING: Color32 = Color32::from_rgb(52, 199, 89);

    /// Nothing is running.
    pub const STATUS_IDLE: Color32 = Color32::from_rgb(142, 142, 147);

    /// Backend unreachable or returned garbage.
    pub const STATUS_ERROR: Color32 = Color32::from_rgb(255, 59, 48);
}

/// Configure egui Visuals for the light theme.
pub fn configure_visuals() -> Visuals {
    let mut visuals = Visuals::light();

    visuals.window_fill = colors::SURFACE;
    visuals.panel_fill = colors::BACKGROUND;
    visuals.faint_bg_color = colors::SURFACE_HOVER;
    visuals.extreme_bg_color = colors::SURFACE;

    visuals.selection.bg_fill = colors::ACCENT_SUBTLE;
    visuals.selection.stroke = Stroke::new(1.0, colors::ACCENT);
    visuals.hyperlink_color = colors::ACCENT;

    visuals.window_stroke = Stroke::new(1.0, colors::BORDER);
    visuals.window_rounding = Rounding::same(rounding::CARD);
    visuals.menu_rounding = Rounding::same(rounding::BUTTON);

    configure_widget_visuals(&mut visuals);

    visuals
}

/// Configure widget-specific visuals.
fn configure_widget_visuals(visuals: &mut Visuals) {
    // Labels, separators
    visuals.widgets.noninteractive.bg_fill = colors::SURFACE;
    visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, colors::SEPARATOR);
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, colors::TEXT_PRIMARY);
    visuals.widgets.noninteractive.rounding = Rounding::same(rounding::BUTTON);

    visuals.widgets.inactive.bg_fill = colors::SURFACE;
    visuals.widgets.inactive.weak_bg_fill = colors::SURFACE;
    visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, colors::BORDER);
    visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, colors::TEXT_PRIMARY);
    visuals.widgets.inactive.rounding = Rounding::same(rounding::BUTTON);

    visuals.widgets.hovered.bg_fill = colors::SURFACE_HOVER;
    visuals.widgets.hovered.weak_bg_fill = colors::SURFACE_HOVER;
    visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, colors::BORDER_FOCUSED);
    visuals.widgets.hovered.fg_stroke = Stroke::new(1.5, colors::TEXT_PRIMARY);
    visuals.widgets.hovered.rounding = Rounding::same(rounding::BUTTON);

    visuals.widgets.active.bg_fill = colors::SURFACE_SELECTED;
    visuals.widgets.active.weak_bg_fill = colors::SURFACE_SELECTED;
    visuals.widgets.active.bg_stroke = Stroke::new(1.0, colors::ACCENT);
    visuals.widgets.active.fg_stroke = Stroke::new(2.0, colors::TEXT_PRIMARY);
    visuals.widgets.active.rounding = Rounding::same(rounding::BUTTON);
}

/// Configure the egui Style with the spacing scale.
pub fn configure_style() -> Style {
    let default_style = Style::default();
    let mut style_spacing = default_style.spacing.clone();

    style_spacing.item_spacing = egui::vec2(spacing::SM, spacing::XS);
    style_spacing.window_margin = egui::Margin::same(spacing::LG);
    style_spacing.button_padding = egui::vec2(spacing::MD, 6.0);

    Style {
        visuals: configure_visuals(),
        spacing: style_spacing,
        animation_time: 0.1,
        ..Default::default()
    }
}

/// Apply the theme. Call once from the eframe creation callback.
pub fn init(ctx: &egui::Context) {
    ctx.set_style(configure_style());
}
