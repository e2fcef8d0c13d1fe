//! Main application orchestration.
//!
//! Wires the HTTP fetcher and row extractor into the refresh scheduler and
//! drives the terminal UI:
//! - Terminal events become form edits and scheduler commands
//! - Board updates from the scheduler are redrawn as they arrive
//! - A periodic tick keeps the status line current

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crypts_core::RenderRow;
use crypts_feed::{HttpFetcher, PageSource, RowExtractor};
use crypts_scheduler::{run_cycle, Board, RefreshScheduler, SchedulerHandle, SchedulerState};
use futures_util::StreamExt;
use ratatui::DefaultTerminal;
use tracing::{debug, error, info, warn};

use crate::config::AppConfig;
use crate::error::AppResult;
use crate::form::{commit_edit, ControlForm, FieldEdit, FormField};
use crate::ui;

/// Whether the event loop should keep going after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Everything the UI draws, owned by the event loop.
#[derive(Debug, Clone)]
pub struct TuiState {
    pub form: ControlForm,
    pub board: Board,
    pub scheduler: SchedulerState,
    pub auto_refresh: bool,
    pub quit_prompt: bool,
    pub source: String,
}

impl TuiState {
    pub fn new(handle: &SchedulerHandle, source: String) -> Self {
        let view = handle.view();
        Self {
            form: ControlForm::from_view(&view),
            board: handle.board().borrow().clone(),
            scheduler: handle.state(),
            auto_refresh: view.refresh.enabled,
            quit_prompt: false,
            source,
        }
    }

    /// Apply one key press.
    pub fn handle_key(&mut self, key: KeyEvent, handle: &SchedulerHandle) -> Flow {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if self.quit_prompt {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => return Flow::Quit,
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => self.quit_prompt = false,
                KeyCode::Char('c') if ctrl => return Flow::Quit,
                _ => {}
            }
            return Flow::Continue;
        }

        match key.code {
            KeyCode::Char('c') if ctrl => return Flow::Quit,
            KeyCode::Char('q') if ctrl => self.quit_prompt = true,
            KeyCode::Esc => self.quit_prompt = true,
            KeyCode::Char('r') if ctrl => handle.refresh_now(),
            KeyCode::F(5) => handle.refresh_now(),
            KeyCode::Char('u') if ctrl => self.form.clear_field(),
            KeyCode::Tab => {
                let edit = self.form.focus_next();
                self.commit(edit, handle);
            }
            KeyCode::BackTab => {
                let edit = self.form.focus_prev();
                self.commit(edit, handle);
            }
            KeyCode::Enter | KeyCode::Char(' ') if self.form.focus() == FormField::AutoRefresh => {
                self.auto_refresh = handle.toggle_auto_refresh();
                self.scheduler = handle.state();
            }
            KeyCode::Enter => {
                let edit = self.form.take_edit();
                self.commit(edit, handle);
            }
            KeyCode::Backspace => self.form.backspace(),
            KeyCode::Char(c) if !ctrl => self.form.input_char(c),
            _ => {}
        }

        Flow::Continue
    }

    fn commit(&mut self, edit: Option<FieldEdit>, handle: &SchedulerHandle) {
        let Some(edit) = edit else {
            return;
        };

        match commit_edit(handle, &edit) {
            Ok(text) => {
                self.form.accept(edit.field, text);
                if edit.field.refreshes_on_commit() {
                    handle.refresh_now();
                }
            }
            Err(e) => {
                warn!(field = ?edit.field, error = %e, "Input rejected");
                self.form.reject(edit.field, e);
            }
        }
    }
}

/// Main application.
pub struct Application {
    config: AppConfig,
    source: Arc<dyn PageSource>,
    extractor: Arc<RowExtractor>,
}

impl Application {
    /// Create an application fetching over HTTP.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let fetcher = HttpFetcher::new(&config.fetcher)?;
        Self::with_source(config, Arc::new(fetcher))
    }

    /// Create an application reading from any page source.
    pub fn with_source(config: AppConfig, source: Arc<dyn PageSource>) -> AppResult<Self> {
        let extractor = Arc::new(RowExtractor::new(config.layout.clone())?);
        Ok(Self {
            config,
            source,
            extractor,
        })
    }

    /// Run a single cycle without the terminal UI.
    pub async fn run_once(&self) -> AppResult<Vec<RenderRow>> {
        info!(source = %self.source.describe(), "Running one-shot cycle");
        let rows = run_cycle(
            self.source.as_ref(),
            Arc::clone(&self.extractor),
            &self.config.view.filter,
        )
        .await?;
        info!(rows = rows.len(), "One-shot cycle completed");
        Ok(rows)
    }

    /// Run the interactive UI until the user quits.
    pub async fn run(self) -> AppResult<()> {
        info!(view = ?self.config.view, "Starting application");

        let (scheduler, handle) = RefreshScheduler::new(
            Arc::clone(&self.source),
            Arc::clone(&self.extractor),
            self.config.view.clone(),
        );
        let scheduler_task = scheduler.spawn();

        let mut terminal = ratatui::init();
        let result = self.event_loop(&mut terminal, &handle).await;
        ratatui::restore();

        handle.shutdown();
        if let Err(e) = scheduler_task.await {
            error!(?e, "Scheduler task failed");
        }

        info!("Shutting down");
        result
    }

    async fn event_loop(&self, terminal: &mut DefaultTerminal, handle: &SchedulerHandle) -> AppResult<()> {
        let mut tui = TuiState::new(handle, self.source.describe());
        let mut events = EventStream::new();
        let mut board_rx = handle.board();
        let mut tick = tokio::time::interval(Duration::from_millis(self.config.ui.tick_ms));

        info!("Entering UI event loop");

        loop {
            terminal.draw(|frame| ui::draw(frame, &tui, &self.config.ui))?;

            tokio::select! {
                maybe_event = events.next() => match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        if tui.handle_key(key, handle) == Flow::Quit {
                            break;
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                    None => {
                        debug!("Terminal event stream closed");
                        break;
                    }
                },

                changed = board_rx.changed() => {
                    if changed.is_err() {
                        warn!("Scheduler stopped publishing");
                        break;
                    }
                    tui.board = board_rx.borrow_and_update().clone();
                    tui.scheduler = handle.state();
                }

                _ = tick.tick() => {
                    tui.scheduler = handle.state();
                }

                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }

        Ok(())
    }
}
