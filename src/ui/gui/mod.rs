//! Native GUI for gorda using eframe/egui.

pub mod app;
pub mod components;
pub mod theme;
