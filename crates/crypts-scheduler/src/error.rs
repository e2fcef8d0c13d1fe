//! Cycle error types.

use crypts_feed::{FetchError, ParseError};
use thiserror::Error;

/// Why a fetch cycle was aborted. Never fatal to the scheduler.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Page layout changed: {0}")]
    Parse(#[from] ParseError),

    #[error("Extraction worker failed: {0}")]
    Worker(String),
}

impl CycleError {
    /// Short classification for status lines and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Fetch(_) => "fetch",
            Self::Parse(_) => "parse",
            Self::Worker(_) => "worker",
        }
    }
}

pub type CycleResult<T> = Result<T, CycleError>;
