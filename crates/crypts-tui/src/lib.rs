//! Terminal crypto market tracker.
//!
//! Wires the crypts pipeline into an interactive terminal UI:
//! - Configuration and command-line overrides
//! - Control panel input with validation feedback
//! - Live asset table fed by the refresh scheduler
//! - One-shot plain-text output

pub mod app;
pub mod config;
pub mod error;
pub mod form;
pub mod ui;

pub use app::{Application, Flow, TuiState};
pub use config::{AppConfig, Overrides};
pub use error::{AppError, AppResult};
pub use ui::plain_table;
