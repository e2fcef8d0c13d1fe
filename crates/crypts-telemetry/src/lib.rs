//! Structured logging for crypts.
//!
//! The terminal belongs to the UI, so interactive runs log to a file and
//! one-shot runs log to stderr.

pub mod error;
pub mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{init_logging, LogTarget, LoggingConfig};
