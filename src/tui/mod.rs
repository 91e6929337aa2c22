//! TUI module: Terminal User Interface using Ratatui.
//!
//! Provides a clinic-themed interface for:
//! - Patient data entry
//! - Risk verdict display

mod app;
mod styles;
mod ui;

pub use app::App;
pub use styles::ClinicTheme;
