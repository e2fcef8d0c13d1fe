//! Scheduler lifecycle state.

use std::fmt;

/// Where the refresh scheduler is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulerState {
    /// Auto-refresh off, nothing in flight.
    #[default]
    Idle,
    /// Auto-refresh on, waiting for the next deadline.
    Running,
    /// A cycle is executing.
    CycleInFlight,
    /// Shut down; no further cycles.
    Stopped,
}

impl SchedulerState {
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::CycleInFlight)
    }
}

impl fmt::Display for SchedulerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::CycleInFlight => "refreshing",
            Self::Stopped => "stopped",
        };
        f.write_str(label)
    }
}
