//! Refresh scheduler lifecycle tests.
//!
//! Drives the scheduler against a scripted page source on a paused clock:
//! - Initial load and filtering through the full pipeline
//! - Failure handling and schedule continuity
//! - Auto-refresh toggling, manual triggers, shutdown

mod integration;
use integration::common::market_page::{drifted_page, named_page, numbered_page};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crypts_core::{FilterConfig, FilterInputError, RefreshState, ViewState};
use crypts_feed::{BoxFuture, ExtractorLayout, FetchResult, MockPageSource, PageSource, RowExtractor};
use crypts_scheduler::{Board, BoardStatus, RefreshScheduler, SchedulerHandle, SchedulerState};
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout, Instant};
use tokio_test::{assert_err, assert_ok};

fn view(row_limit: usize, auto: bool, delay_secs: u64) -> ViewState {
    ViewState {
        filter: FilterConfig {
            row_limit,
            ..Default::default()
        },
        refresh: RefreshState {
            enabled: auto,
            delay_secs,
        },
    }
}

fn extractor() -> Arc<RowExtractor> {
    Arc::new(RowExtractor::new(ExtractorLayout::default()).unwrap())
}

fn scheduler(source: &Arc<MockPageSource>, initial: ViewState) -> (RefreshScheduler, SchedulerHandle) {
    RefreshScheduler::new(source.clone(), extractor(), initial)
}

/// Serves one page after a fixed delay and records that the fetch ran to the end.
struct SlowPage {
    page: String,
    delay: Duration,
    finished: AtomicBool,
}

impl PageSource for SlowPage {
    fn fetch(&self) -> BoxFuture<'_, FetchResult<String>> {
        Box::pin(async move {
            sleep(self.delay).await;
            self.finished.store(true, Ordering::SeqCst);
            Ok(self.page.clone())
        })
    }

    fn describe(&self) -> String {
        "slow page".to_string()
    }
}

fn start(source: &Arc<MockPageSource>, initial: ViewState) -> (SchedulerHandle, JoinHandle<()>) {
    let (scheduler, handle) = scheduler(source, initial);
    (handle, scheduler.spawn())
}

/// Wait until the published board satisfies `pred`.
async fn wait_for_board(handle: &SchedulerHandle, pred: impl Fn(&Board) -> bool) -> Board {
    let mut rx = handle.board();
    timeout(Duration::from_secs(300), async {
        loop {
            {
                let board = rx.borrow_and_update();
                if pred(&board) {
                    return board.clone();
                }
            }
            rx.changed().await.expect("scheduler dropped the board");
        }
    })
    .await
    .expect("board condition not reached")
}

fn names(board: &Board) -> Vec<String> {
    board.rows.iter().map(|r| r.name.text.clone()).collect()
}

#[tokio::test(start_paused = true)]
async fn test_initial_load_publishes_limited_rows() {
    let source = Arc::new(MockPageSource::with_page(numbered_page(12)));
    let (handle, task) = start(&source, view(5, false, 5));

    let board = wait_for_board(&handle, |b| b.cycles_ok == 1).await;

    assert_eq!(names(&board), vec!["Coin 1", "Coin 2", "Coin 3", "Coin 4", "Coin 5"]);
    assert!(matches!(board.status, BoardStatus::Fresh { shown: 5, .. }));
    assert!(board.last_success.is_some());
    assert_eq!(handle.state(), SchedulerState::Idle);

    // Auto-refresh is off, so nothing else is fetched.
    sleep(Duration::from_secs(60)).await;
    assert_eq!(source.calls(), 1);

    handle.shutdown();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_name_filter_applies_on_next_cycle() {
    let source = Arc::new(MockPageSource::with_page(named_page(&[
        ("Bitcoin", "$64,000.00"),
        ("Ethereum", "$3,100.00"),
        ("Bitcoin Cash", "$420.00"),
    ])));
    let (handle, task) = start(&source, view(10, false, 5));
    wait_for_board(&handle, |b| b.cycles_ok == 1).await;

    assert_eq!(handle.set_name_filter("  bit "), Some("bit".to_string()));
    handle.refresh_now();
    let board = wait_for_board(&handle, |b| b.cycles_ok == 2).await;
    assert_eq!(names(&board), vec!["Bitcoin", "Bitcoin Cash"]);

    assert_ok!(handle.set_min_price("1,000"));
    handle.refresh_now();
    let board = wait_for_board(&handle, |b| b.cycles_ok == 3).await;
    assert_eq!(names(&board), vec!["Bitcoin"]);

    handle.shutdown();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_empty_result_is_a_success() {
    let source = Arc::new(MockPageSource::with_page(numbered_page(3)));
    let initial = ViewState {
        filter: FilterConfig {
            row_limit: 10,
            name_substring: Some("no such coin".to_string()),
            ..Default::default()
        },
        refresh: RefreshState::default(),
    };
    let (handle, task) = start(&source, initial);

    let board = wait_for_board(&handle, |b| b.cycles_ok == 1).await;
    assert!(board.rows.is_empty());
    assert!(!board.is_failed());

    handle.shutdown();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_failed_cycle_keeps_rows_and_schedule() {
    let source = Arc::new(MockPageSource::with_page(named_page(&[("Later", "$2.00")])));
    source.push(Ok(named_page(&[("First", "$1.00")])));
    source.push(Ok(drifted_page()));

    let (handle, task) = start(&source, view(10, true, 5));

    let board = wait_for_board(&handle, |b| b.cycles_ok == 1).await;
    assert_eq!(names(&board), vec!["First"]);

    let board = wait_for_board(&handle, |b| b.cycles_failed == 1).await;
    assert!(board.is_failed());
    assert_eq!(names(&board), vec!["First"]);
    match &board.status {
        BoardStatus::Failed { kind, message, .. } => {
            assert_eq!(*kind, "parse");
            assert!(message.contains("table"));
        }
        other => panic!("Expected failure, got {other:?}"),
    }
    assert_eq!(handle.state(), SchedulerState::Running);

    // The schedule keeps going and the next good page replaces the rows.
    let board = wait_for_board(&handle, |b| b.cycles_ok == 2).await;
    assert_eq!(names(&board), vec!["Later"]);
    assert!(!board.is_failed());

    handle.shutdown();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_fetch_failure_reported() {
    let source = Arc::new(MockPageSource::scripted(vec![Err(
        crypts_feed::FetchError::Status {
            status: 503,
            url: "mock".to_string(),
        },
    )]));
    let (handle, task) = start(&source, view(10, false, 5));

    let board = wait_for_board(&handle, |b| b.cycles_failed == 1).await;
    assert!(board.rows.is_empty());
    assert!(board.last_success.is_none());
    assert!(matches!(board.status, BoardStatus::Failed { kind: "fetch", .. }));

    handle.shutdown();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_rejected_delay_keeps_previous_value() {
    let source = Arc::new(MockPageSource::with_page(numbered_page(1)));
    let (scheduler, handle) = scheduler(&source, view(10, false, 5));
    let task = scheduler.without_initial_load().spawn();

    assert_eq!(handle.set_delay("5").unwrap(), 5);

    let err = assert_err!(handle.set_delay("0"));
    assert!(matches!(err, FilterInputError::NotPositive { field: "delay", .. }));
    assert_eq!(handle.view().refresh.delay_secs, 5);

    let err = assert_err!(handle.set_delay("soon"));
    assert!(matches!(err, FilterInputError::NotANumber { .. }));
    assert_eq!(handle.view().refresh.delay_secs, 5);

    assert_err!(handle.set_row_limit("-3"));
    assert_eq!(handle.view().filter.row_limit, 10);

    handle.shutdown();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_toggle_on_arms_after_delay() {
    let source = Arc::new(MockPageSource::with_page(numbered_page(2)));
    let (scheduler, handle) = scheduler(&source, view(10, false, 5));
    let task = scheduler.without_initial_load().spawn();

    sleep(Duration::from_secs(30)).await;
    assert_eq!(source.calls(), 0);
    assert_eq!(handle.state(), SchedulerState::Idle);

    handle.set_auto_refresh(true);
    sleep(Duration::from_secs(4)).await;
    assert_eq!(source.calls(), 0);
    assert_eq!(handle.state(), SchedulerState::Running);

    let board = wait_for_board(&handle, |b| b.cycles_ok == 1).await;
    assert_eq!(board.rows.len(), 2);

    handle.shutdown();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_toggle_off_cancels_pending_refresh() {
    let source = Arc::new(MockPageSource::with_page(numbered_page(2)));
    let (handle, task) = start(&source, view(10, true, 5));

    wait_for_board(&handle, |b| b.cycles_ok == 1).await;
    assert_eq!(handle.state(), SchedulerState::Running);

    assert!(!handle.toggle_auto_refresh());
    sleep(Duration::from_secs(30)).await;

    assert_eq!(source.calls(), 1);
    assert_eq!(handle.state(), SchedulerState::Idle);

    handle.shutdown();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_manual_refresh_ignored_while_in_flight() {
    let source =
        Arc::new(MockPageSource::with_page(numbered_page(2)).with_delay(Duration::from_secs(3)));
    let (scheduler, handle) = scheduler(&source, view(10, false, 5));
    let task = scheduler.without_initial_load().spawn();

    handle.refresh_now();
    sleep(Duration::from_millis(100)).await;
    assert_eq!(handle.state(), SchedulerState::CycleInFlight);

    handle.refresh_now();
    handle.refresh_now();

    wait_for_board(&handle, |b| b.cycles_ok == 1).await;
    sleep(Duration::from_secs(10)).await;
    assert_eq!(source.calls(), 1);
    assert_eq!(handle.state(), SchedulerState::Idle);

    handle.shutdown();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_cycle_uses_snapshot_from_start() {
    let source =
        Arc::new(MockPageSource::with_page(numbered_page(12)).with_delay(Duration::from_secs(2)));
    let (scheduler, handle) = scheduler(&source, view(10, false, 5));
    let task = scheduler.without_initial_load().spawn();

    handle.refresh_now();
    sleep(Duration::from_millis(100)).await;
    assert_eq!(handle.set_row_limit("2").unwrap(), 2);

    let board = wait_for_board(&handle, |b| b.cycles_ok == 1).await;
    assert_eq!(board.rows.len(), 10);

    handle.refresh_now();
    let board = wait_for_board(&handle, |b| b.cycles_ok == 2).await;
    assert_eq!(names(&board), vec!["Coin 1", "Coin 2"]);

    handle.shutdown();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_lets_in_flight_cycle_finish_unpublished() {
    let source = Arc::new(SlowPage {
        page: numbered_page(2),
        delay: Duration::from_secs(5),
        finished: AtomicBool::new(false),
    });
    let (scheduler, handle) = RefreshScheduler::new(source.clone(), extractor(), view(10, true, 5));
    let task = scheduler.spawn();

    sleep(Duration::from_millis(100)).await;
    assert_eq!(handle.state(), SchedulerState::CycleInFlight);

    handle.shutdown();
    task.await.unwrap();
    assert!(handle.is_shutdown());
    assert_eq!(handle.state(), SchedulerState::Stopped);
    assert!(!source.finished.load(Ordering::SeqCst));

    sleep(Duration::from_secs(30)).await;
    assert!(source.finished.load(Ordering::SeqCst));

    let board = handle.board().borrow().clone();
    assert_eq!(board.status, BoardStatus::Loading);
    assert_eq!(board.cycles_ok, 0);
    assert!(board.rows.is_empty());

    // Commands after shutdown are dropped quietly.
    handle.refresh_now();
    handle.set_auto_refresh(false);
}

#[tokio::test(start_paused = true)]
async fn test_oversized_delay_rejected_and_schedule_survives() {
    let source = Arc::new(MockPageSource::with_page(numbered_page(2)));
    let (scheduler, handle) = scheduler(&source, view(10, false, 5));
    let task = scheduler.without_initial_load().spawn();

    let err = assert_err!(handle.set_delay("9223372036854775807"));
    assert!(matches!(err, FilterInputError::TooLarge { field: "delay", .. }));
    assert_eq!(handle.view().refresh.delay_secs, 5);

    handle.set_auto_refresh(true);
    let board = wait_for_board(&handle, |b| b.cycles_ok == 1).await;
    assert_eq!(board.rows.len(), 2);
    assert_eq!(handle.state(), SchedulerState::Running);
    assert!(!task.is_finished());

    handle.shutdown();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_unrepresentable_delay_leaves_scheduler_idle() {
    let source = Arc::new(MockPageSource::with_page(numbered_page(2)));
    let (handle, task) = start(&source, view(10, true, u64::MAX));

    wait_for_board(&handle, |b| b.cycles_ok == 1).await;
    assert_eq!(handle.state(), SchedulerState::Idle);
    assert!(!task.is_finished());

    assert_ok!(handle.set_delay("5"));
    handle.set_auto_refresh(false);
    handle.set_auto_refresh(true);

    wait_for_board(&handle, |b| b.cycles_ok == 2).await;
    assert_eq!(source.calls(), 2);

    handle.shutdown();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_toggle_on_while_in_flight_arms_after_completion() {
    let source =
        Arc::new(MockPageSource::with_page(numbered_page(2)).with_delay(Duration::from_secs(3)));
    let (scheduler, handle) = scheduler(&source, view(10, false, 5));
    let task = scheduler.without_initial_load().spawn();

    handle.refresh_now();
    sleep(Duration::from_millis(100)).await;
    assert_eq!(handle.state(), SchedulerState::CycleInFlight);

    handle.set_auto_refresh(true);
    sleep(Duration::from_millis(100)).await;
    assert_eq!(handle.state(), SchedulerState::CycleInFlight);
    assert_eq!(source.calls(), 1);

    wait_for_board(&handle, |b| b.cycles_ok == 1).await;
    let completed = Instant::now();
    assert_eq!(handle.state(), SchedulerState::Running);

    // The delay counts from completion, not from the toggle.
    sleep(Duration::from_secs(4)).await;
    assert_eq!(source.calls(), 1);

    wait_for_board(&handle, |b| b.cycles_ok == 2).await;
    assert_eq!(source.calls(), 2);
    assert!(completed.elapsed() >= Duration::from_secs(8));

    handle.shutdown();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_manual_refresh_while_running_rearms() {
    let source = Arc::new(MockPageSource::with_page(numbered_page(2)));
    let (handle, task) = start(&source, view(10, true, 10));

    wait_for_board(&handle, |b| b.cycles_ok == 1).await;
    assert_eq!(handle.state(), SchedulerState::Running);

    sleep(Duration::from_secs(6)).await;
    handle.refresh_now();
    wait_for_board(&handle, |b| b.cycles_ok == 2).await;
    let rearmed = Instant::now();
    assert_eq!(handle.state(), SchedulerState::Running);

    // The deadline from the first cycle would have fired 4s after the manual one.
    sleep(Duration::from_secs(8)).await;
    assert_eq!(source.calls(), 2);

    wait_for_board(&handle, |b| b.cycles_ok == 3).await;
    assert_eq!(source.calls(), 3);
    assert!(rearmed.elapsed() >= Duration::from_secs(10));

    handle.shutdown();
    task.await.unwrap();
}
