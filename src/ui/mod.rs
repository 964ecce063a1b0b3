//! UI module for gorda.
//!
//! # Submodules
//!
//! - [`gui`] - Native window using eframe/egui
//! - [`tui`] - Terminal view using ratatui
//! - [`shared`] - View state both of them draw from

pub mod gui;
pub mod shared;
pub mod tui;
