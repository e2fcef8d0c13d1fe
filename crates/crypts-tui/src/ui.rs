//! Terminal rendering with ratatui.
//!
//! Layout, top to bottom: banner, REFRESH and FILTERS panels side by side,
//! the asset table, then key hints and the status line.

use chrono::{DateTime, Local, Utc};
use crypts_core::{Emphasis, RenderCell, RenderRow};
use crypts_scheduler::{BoardStatus, SchedulerState};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::app::TuiState;
use crate::config::UiConfig;
use crate::form::FormField;

/// xterm-256 pink used for titles and asset names.
const ACCENT: Color = Color::Indexed(212);

const BANNER: [&str; 3] = [
    "░█▀▀░█▀▄░█░█░█▀█░▀█▀░█▀▀",
    "░█░░░█▀▄░░█░░█▀▀░░█░░▀▀█",
    "░▀▀▀░▀░▀░░▀░░▀░░░░▀░░▀▀▀",
];

const KEY_HINTS: &str =
    "Tab/Shift-Tab focus · Enter apply · Space toggle auto · F5/Ctrl-R refresh · Esc quit";

/// Render the whole screen.
pub fn draw(frame: &mut Frame, tui: &TuiState, config: &UiConfig) {
    let banner_height = if config.show_banner {
        BANNER.len() as u16 + 1
    } else {
        0
    };

    let [banner, controls, body, footer] = Layout::vertical([
        Constraint::Length(banner_height),
        Constraint::Length(3),
        Constraint::Min(5),
        Constraint::Length(2),
    ])
    .areas(frame.area());

    if config.show_banner {
        render_banner(frame, banner);
    }

    let [refresh, filters] =
        Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)]).areas(controls);
    render_refresh_panel(frame, tui, refresh);
    render_filters_panel(frame, tui, filters);

    render_table(frame, tui, body);
    render_footer(frame, tui, footer);

    if tui.quit_prompt {
        render_quit_prompt(frame);
    }
}

fn render_banner(frame: &mut Frame, area: Rect) {
    let style = Style::default().fg(ACCENT).add_modifier(Modifier::BOLD);
    let lines: Vec<Line> = BANNER.iter().map(|l| Line::styled(*l, style)).collect();
    frame.render_widget(Paragraph::new(lines), area);
}

fn panel(title: &str) -> Block<'_> {
    Block::default()
        .title(Span::styled(
            format!(" {title} "),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::TOP | Borders::BOTTOM)
}

fn render_refresh_panel(frame: &mut Frame, tui: &TuiState, area: Rect) {
    let focused = tui.form.focus() == FormField::AutoRefresh;
    let mark = if tui.auto_refresh { "[x]" } else { "[ ]" };

    let mut spans = vec![
        Span::styled(format!("{mark} {}", FormField::AutoRefresh.label()), field_style(focused)),
        Span::raw("   "),
    ];
    spans.extend(text_field(tui, FormField::Delay));
    spans.push(Span::raw("   "));
    spans.extend(text_field(tui, FormField::Rows));

    frame.render_widget(Paragraph::new(Line::from(spans)).block(panel("REFRESH")), area);
}

fn render_filters_panel(frame: &mut Frame, tui: &TuiState, area: Rect) {
    let mut spans = text_field(tui, FormField::Name);
    spans.push(Span::raw("   "));
    spans.extend(text_field(tui, FormField::MinPrice));
    spans.push(Span::raw("   "));
    spans.extend(text_field(tui, FormField::MaxPrice));

    frame.render_widget(Paragraph::new(Line::from(spans)).block(panel("FILTERS")), area);
}

fn text_field(tui: &TuiState, field: FormField) -> Vec<Span<'static>> {
    let focused = tui.form.focus() == field;
    let mut value = tui.form.text(field).to_string();
    if focused {
        value.push('▏');
    }
    vec![
        Span::styled(field.label(), Style::default().fg(Color::Gray)),
        Span::styled(value, field_style(focused)),
    ]
}

fn field_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(ACCENT).add_modifier(Modifier::UNDERLINED)
    } else {
        Style::default()
    }
}

fn render_table(frame: &mut Frame, tui: &TuiState, area: Rect) {
    let block = Block::default().borders(Borders::ALL);
    let board = &tui.board;

    if board.rows.is_empty() {
        let message = match &board.status {
            BoardStatus::Loading => "Loading market data…".to_string(),
            BoardStatus::Fresh { .. } => "No assets match the current filters".to_string(),
            BoardStatus::Failed { message, .. } => format!("No data yet: {message}"),
        };
        let placeholder = Paragraph::new(message)
            .style(Style::default().fg(Color::Gray))
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let header_style = Style::default().fg(ACCENT).add_modifier(Modifier::BOLD);
    let header = Row::new(
        RenderRow::HEADERS
            .iter()
            .map(|h| Cell::from(*h).style(header_style)),
    )
    .height(1)
    .bottom_margin(1);

    let rows = board.rows.iter().map(|row| {
        Row::new(
            row.cells()
                .into_iter()
                .map(|cell| Cell::from(cell.display()).style(emphasis_style(cell))),
        )
    });

    let widths = [
        Constraint::Fill(3),
        Constraint::Fill(2),
        Constraint::Fill(2),
        Constraint::Fill(2),
        Constraint::Fill(2),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(2)
        .block(block);

    frame.render_widget(table, area);
}

fn emphasis_style(cell: &RenderCell) -> Style {
    match cell.emphasis {
        Emphasis::Positive => Style::default().fg(Color::Green),
        Emphasis::Negative => Style::default().fg(Color::Red),
        Emphasis::Accent => Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        Emphasis::Strong => Style::default().add_modifier(Modifier::BOLD),
    }
}

fn render_footer(frame: &mut Frame, tui: &TuiState, area: Rect) {
    let status_style = if tui.form.error().is_some() || tui.board.is_failed() {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    };

    let lines = vec![
        Line::styled(KEY_HINTS, Style::default().fg(Color::DarkGray)),
        Line::styled(status_text(tui), status_style),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

/// Status line: scheduler state, last update, counters, then any error.
pub fn status_text(tui: &TuiState) -> String {
    let board = &tui.board;
    let mut parts = vec![state_label(tui.scheduler).to_string()];

    match &board.status {
        BoardStatus::Loading => parts.push(format!("loading from {}", tui.source)),
        BoardStatus::Fresh { at, shown } => {
            parts.push(format!("updated {} ({shown} shown)", clock(at)));
        }
        BoardStatus::Failed { at, kind, message } => {
            parts.push(format!("{kind} failed at {}: {message}", clock(at)));
            if let Some(last) = &board.last_success {
                parts.push(format!("showing data from {}", clock(last)));
            }
        }
    }

    parts.push(format!("ok {} / failed {}", board.cycles_ok, board.cycles_failed));

    if let Some(error) = tui.form.error() {
        parts.push(error.to_string());
    }

    parts.join(" | ")
}

fn state_label(state: SchedulerState) -> &'static str {
    match state {
        SchedulerState::Idle => "manual",
        SchedulerState::Running => "auto",
        SchedulerState::CycleInFlight => "refreshing…",
        SchedulerState::Stopped => "stopped",
    }
}

fn clock(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M:%S").to_string()
}

fn render_quit_prompt(frame: &mut Frame) {
    let area = centered_rect(40, 20, frame.area());

    let prompt = Paragraph::new(vec![
        Line::styled(
            "Are you sure you want to quit?",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Line::raw(""),
        Line::raw("[y] Yes    [n] No"),
    ])
    .block(
        Block::default()
            .title(" Quit ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(ACCENT)),
    )
    .wrap(Wrap { trim: true });

    frame.render_widget(Clear, area);
    frame.render_widget(prompt, area);
}

/// Create a centered rectangle.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Plain-text table for one-shot output. Columns are padded to the widest
/// cell; glyphs stand in for color.
pub fn plain_table(rows: &[RenderRow]) -> String {
    let body: Vec<[String; 5]> = rows
        .iter()
        .map(|row| row.cells().map(|cell| cell.display()))
        .collect();

    let mut widths = RenderRow::HEADERS.map(|h| h.chars().count());
    for cells in &body {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_line = |cells: &[&str]| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        padded.join("  ").trim_end().to_string()
    };

    let mut out = format_line(&RenderRow::HEADERS);
    out.push('\n');
    for cells in &body {
        let refs: Vec<&str> = cells.iter().map(String::as_str).collect();
        out.push_str(&format_line(&refs));
        out.push('\n');
    }
    out
}
