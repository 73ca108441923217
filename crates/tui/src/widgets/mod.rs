//! TUI widgets module.
//!
//! This module contains the widgets the workout screen is built from.

pub mod exercise_table;
pub mod status_panel;

pub use exercise_table::render_exercise_table;
pub use status_panel::render_status_panel;
