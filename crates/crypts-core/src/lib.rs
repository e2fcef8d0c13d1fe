//! Core domain types for the crypts market tracker.
//!
//! This crate provides the data model shared by every pipeline stage:
//! - `RawAssetRecord`, `Trend`: rows extracted from the market page
//! - `FilterConfig`, `RefreshState`, `ViewState`: user-adjustable view state
//! - `RenderRow`, `RenderCell`: display-ready rows
//! - `FilterInputError`: rejected user input

pub mod error;
pub mod numeric;
pub mod render;
pub mod types;
pub mod view_state;

pub use error::{FilterInputError, InputResult};
pub use numeric::parse_display_decimal;
pub use render::{Emphasis, Glyph, RenderCell, RenderRow};
pub use types::{RawAssetRecord, Trend, TrendCell};
pub use view_state::{
    parse_delay_secs, parse_price_bound, parse_row_limit, FilterConfig, RefreshState, ViewState,
    DEFAULT_DELAY_SECS, DEFAULT_ROW_LIMIT, MAX_DELAY_SECS,
};
