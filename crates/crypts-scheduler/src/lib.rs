//! Refresh scheduling for crypts.
//!
//! Owns the cycle lifecycle: manual triggers, the auto-refresh timer, and
//! publication of each cycle's outcome to the UI. At most one cycle runs at
//! a time.

pub mod board;
pub mod error;
pub mod pipeline;
pub mod scheduler;
pub mod state;

pub use board::{Board, BoardStatus};
pub use error::{CycleError, CycleResult};
pub use pipeline::run_cycle;
pub use scheduler::{RefreshScheduler, SchedulerHandle};
pub use state::SchedulerState;
