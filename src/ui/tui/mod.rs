//! Terminal view for gorda using ratatui.

pub mod app;
