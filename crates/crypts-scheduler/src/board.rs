//! Published presentation state.
//!
//! The board is what the UI renders: the latest successful rows plus the
//! outcome of the most recent cycle. A failed cycle updates the status only,
//! so the previously rendered table stays on screen.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use crypts_core::RenderRow;

use crate::error::CycleResult;

/// Outcome of the most recent cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardStatus {
    /// No cycle has completed yet.
    Loading,
    /// Last cycle succeeded.
    Fresh { at: DateTime<Utc>, shown: usize },
    /// Last cycle failed; rows are from an earlier success (if any).
    Failed {
        at: DateTime<Utc>,
        kind: &'static str,
        message: String,
    },
}

/// Latest rows and cycle bookkeeping.
#[derive(Debug, Clone)]
pub struct Board {
    pub rows: Arc<Vec<RenderRow>>,
    pub status: BoardStatus,
    pub last_success: Option<DateTime<Utc>>,
    pub cycles_ok: u64,
    pub cycles_failed: u64,
    /// Wall time of the last completed cycle.
    pub last_cycle_ms: Option<u64>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            rows: Arc::new(Vec::new()),
            status: BoardStatus::Loading,
            last_success: None,
            cycles_ok: 0,
            cycles_failed: 0,
            last_cycle_ms: None,
        }
    }

    /// Fold a cycle outcome into the board.
    ///
    /// Success replaces the rows wholesale; failure leaves them untouched.
    pub fn apply(&mut self, outcome: CycleResult<Vec<RenderRow>>, at: DateTime<Utc>, elapsed: Duration) {
        self.last_cycle_ms = Some(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX));

        match outcome {
            Ok(rows) => {
                self.status = BoardStatus::Fresh {
                    at,
                    shown: rows.len(),
                };
                self.rows = Arc::new(rows);
                self.last_success = Some(at);
                self.cycles_ok += 1;
            }
            Err(error) => {
                self.status = BoardStatus::Failed {
                    at,
                    kind: error.kind(),
                    message: error.to_string(),
                };
                self.cycles_failed += 1;
            }
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, BoardStatus::Failed { .. })
    }
}
