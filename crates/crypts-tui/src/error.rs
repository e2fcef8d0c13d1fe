//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid argument: {0}")]
    Input(#[from] crypts_core::FilterInputError),

    #[error("Fetcher error: {0}")]
    Fetch(#[from] crypts_feed::FetchError),

    #[error("Extractor error: {0}")]
    Parse(#[from] crypts_feed::ParseError),

    #[error("Refresh failed: {0}")]
    Cycle(#[from] crypts_scheduler::CycleError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] crypts_telemetry::TelemetryError),

    #[error("Terminal error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
