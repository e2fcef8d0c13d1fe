//! Refresh scheduler.
//!
//! A single task owns the lifecycle. Cycles run on their own task and report
//! back through a channel, so the loop keeps answering commands and shutdown
//! while a fetch is outstanding.
//!
//! # Rules
//! - At most one cycle in flight; manual triggers during a cycle are dropped.
//! - The next deadline is armed only after a cycle completes, so cycles never
//!   overlap and a slow fetch stretches the interval instead of stacking.
//! - Every cycle works on the view snapshot taken when it started.
//! - A failed cycle keeps the previous rows and does not stop auto-refresh.
//! - Shutdown lets an in-flight cycle finish and drops its result.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use crypts_core::{InputResult, RenderRow, ViewState};
use crypts_feed::{PageSource, RowExtractor};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::board::Board;
use crate::error::CycleResult;
use crate::pipeline::run_cycle;
use crate::state::SchedulerState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    RefreshNow,
    AutoRefreshChanged,
}

struct CycleReport {
    id: u64,
    elapsed: Duration,
    result: CycleResult<Vec<RenderRow>>,
}

/// Cheap, cloneable control surface for the scheduler.
///
/// Setters validate raw UI text. A rejected value leaves the view state as
/// it was and returns the reason.
#[derive(Clone)]
pub struct SchedulerHandle {
    view: Arc<RwLock<ViewState>>,
    state: Arc<RwLock<SchedulerState>>,
    commands: mpsc::UnboundedSender<Command>,
    board: watch::Receiver<Board>,
    shutdown_token: CancellationToken,
}

impl SchedulerHandle {
    /// Request an immediate cycle. Ignored if one is already in flight.
    pub fn refresh_now(&self) {
        self.send(Command::RefreshNow);
    }

    pub fn set_auto_refresh(&self, enabled: bool) {
        let changed = {
            let mut view = self.view.write();
            let changed = view.refresh.enabled != enabled;
            view.refresh.enabled = enabled;
            changed
        };
        if changed {
            info!(enabled, "Auto-refresh toggled");
            self.send(Command::AutoRefreshChanged);
        }
    }

    /// Flip auto-refresh and return the new setting.
    pub fn toggle_auto_refresh(&self) -> bool {
        let enabled = !self.view.read().refresh.enabled;
        self.set_auto_refresh(enabled);
        enabled
    }

    /// Takes effect from the next deadline; a pending one is not moved.
    pub fn set_delay(&self, input: &str) -> InputResult<u64> {
        let mut view = self.view.write();
        view.refresh.set_delay(input)?;
        debug!(delay_secs = view.refresh.delay_secs, "Refresh delay updated");
        Ok(view.refresh.delay_secs)
    }

    pub fn set_row_limit(&self, input: &str) -> InputResult<usize> {
        let mut view = self.view.write();
        view.filter.set_row_limit(input)?;
        debug!(row_limit = view.filter.row_limit, "Row limit updated");
        Ok(view.filter.row_limit)
    }

    pub fn set_name_filter(&self, input: &str) -> Option<String> {
        let mut view = self.view.write();
        view.filter.set_name_filter(input);
        debug!(name = ?view.filter.name_substring, "Name filter updated");
        view.filter.name_substring.clone()
    }

    pub fn set_min_price(&self, input: &str) -> InputResult<Option<Decimal>> {
        let mut view = self.view.write();
        view.filter.set_min_price(input)?;
        debug!(min_price = ?view.filter.min_price, "Min price updated");
        Ok(view.filter.min_price)
    }

    pub fn set_max_price(&self, input: &str) -> InputResult<Option<Decimal>> {
        let mut view = self.view.write();
        view.filter.set_max_price(input)?;
        debug!(max_price = ?view.filter.max_price, "Max price updated");
        Ok(view.filter.max_price)
    }

    /// Copy of the current view state.
    pub fn view(&self) -> ViewState {
        self.view.read().clone()
    }

    pub fn state(&self) -> SchedulerState {
        *self.state.read()
    }

    /// Subscribe to board updates.
    pub fn board(&self) -> watch::Receiver<Board> {
        self.board.clone()
    }

    /// Stop the scheduler. An in-flight cycle's result is discarded.
    pub fn shutdown(&self) {
        info!("Refresh scheduler shutdown requested");
        self.shutdown_token.cancel();
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown_token.is_cancelled()
    }

    fn send(&self, command: Command) {
        if self.commands.send(command).is_err() {
            debug!(?command, "Scheduler gone, command dropped");
        }
    }
}

/// Owns the refresh lifecycle. Consumed by [`RefreshScheduler::run`].
pub struct RefreshScheduler {
    source: Arc<dyn PageSource>,
    extractor: Arc<RowExtractor>,
    view: Arc<RwLock<ViewState>>,
    state: Arc<RwLock<SchedulerState>>,
    commands: mpsc::UnboundedReceiver<Command>,
    board_tx: watch::Sender<Board>,
    shutdown_token: CancellationToken,
    initial_load: bool,
}

impl RefreshScheduler {
    pub fn new(
        source: Arc<dyn PageSource>,
        extractor: Arc<RowExtractor>,
        initial: ViewState,
    ) -> (Self, SchedulerHandle) {
        let view = Arc::new(RwLock::new(initial));
        let state = Arc::new(RwLock::new(SchedulerState::Idle));
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (board_tx, board_rx) = watch::channel(Board::new());
        let shutdown_token = CancellationToken::new();

        let handle = SchedulerHandle {
            view: Arc::clone(&view),
            state: Arc::clone(&state),
            commands: command_tx,
            board: board_rx,
            shutdown_token: shutdown_token.clone(),
        };

        let scheduler = Self {
            source,
            extractor,
            view,
            state,
            commands: command_rx,
            board_tx,
            shutdown_token,
            initial_load: true,
        };

        (scheduler, handle)
    }

    /// Skip the startup cycle; the first fetch then waits for a trigger or
    /// the first deadline.
    pub fn without_initial_load(mut self) -> Self {
        self.initial_load = false;
        self
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Run until shutdown.
    pub async fn run(mut self) {
        let (done_tx, mut done_rx) = mpsc::channel::<CycleReport>(1);
        let mut next_tick: Option<Instant> = None;
        let mut in_flight = false;
        let mut cycle_id: u64 = 0;

        info!(source = %self.source.describe(), "Refresh scheduler started");

        if self.initial_load {
            cycle_id += 1;
            self.start_cycle(cycle_id, &done_tx);
            in_flight = true;
        } else {
            next_tick = self.arm();
        }

        loop {
            let deadline = next_tick;

            tokio::select! {
                biased;

                () = self.shutdown_token.cancelled() => {
                    info!("Shutdown signal received in scheduler loop");
                    break;
                }

                Some(report) = done_rx.recv() => {
                    in_flight = false;
                    self.publish(report);
                    next_tick = self.arm();
                }

                Some(command) = self.commands.recv() => match command {
                    Command::RefreshNow => {
                        if in_flight {
                            debug!("Cycle already in flight, ignoring manual refresh");
                        } else {
                            next_tick = None;
                            cycle_id += 1;
                            self.start_cycle(cycle_id, &done_tx);
                            in_flight = true;
                        }
                    }
                    Command::AutoRefreshChanged => {
                        if self.view.read().refresh.enabled {
                            // Armed on completion if a cycle is running.
                            if !in_flight && next_tick.is_none() {
                                next_tick = self.arm();
                            }
                        } else {
                            if next_tick.take().is_some() {
                                debug!("Pending refresh cancelled");
                            }
                            if !in_flight {
                                self.set_state(SchedulerState::Idle);
                            }
                        }
                    }
                },

                () = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)),
                    if deadline.is_some() && !in_flight =>
                {
                    next_tick = None;
                    cycle_id += 1;
                    self.start_cycle(cycle_id, &done_tx);
                    in_flight = true;
                }
            }
        }

        self.set_state(SchedulerState::Stopped);
        info!(cycles = cycle_id, "Refresh scheduler stopped");
    }

    /// Compute the next deadline from the current delay, or go idle.
    fn arm(&self) -> Option<Instant> {
        let refresh = self.view.read().refresh;
        if !refresh.enabled {
            self.set_state(SchedulerState::Idle);
            return None;
        }

        match Instant::now().checked_add(Duration::from_secs(refresh.delay_secs)) {
            Some(deadline) => {
                self.set_state(SchedulerState::Running);
                Some(deadline)
            }
            None => {
                warn!(delay_secs = refresh.delay_secs, "Refresh delay out of range, not arming");
                self.set_state(SchedulerState::Idle);
                None
            }
        }
    }

    fn start_cycle(&self, id: u64, done_tx: &mpsc::Sender<CycleReport>) {
        let snapshot = self.view.read().clone();
        self.set_state(SchedulerState::CycleInFlight);
        debug!(
            cycle = id,
            row_limit = snapshot.filter.row_limit,
            filtered = snapshot.filter.has_predicates(),
            "Cycle started"
        );

        let source = Arc::clone(&self.source);
        let extractor = Arc::clone(&self.extractor);
        let done_tx = done_tx.clone();

        tokio::spawn(async move {
            let started = Instant::now();
            let result = run_cycle(source.as_ref(), extractor, &snapshot.filter).await;
            let report = CycleReport {
                id,
                elapsed: started.elapsed(),
                result,
            };
            if done_tx.send(report).await.is_err() {
                debug!(cycle = id, "Scheduler stopped, cycle result discarded");
            }
        });
    }

    fn publish(&self, report: CycleReport) {
        let elapsed_ms = u64::try_from(report.elapsed.as_millis()).unwrap_or(u64::MAX);
        match &report.result {
            Ok(rows) => info!(cycle = report.id, rows = rows.len(), elapsed_ms, "Cycle completed"),
            Err(e) => warn!(
                cycle = report.id,
                kind = e.kind(),
                error = %e,
                elapsed_ms,
                "Cycle failed, keeping previous rows"
            ),
        }

        self.board_tx
            .send_modify(|board| board.apply(report.result, Utc::now(), report.elapsed));
    }

    fn set_state(&self, state: SchedulerState) {
        *self.state.write() = state;
    }
}
