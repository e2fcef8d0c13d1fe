//! Asset records extracted from the market page.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::numeric::parse_display_decimal;

/// Direction a value moved since the prior observed period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    #[default]
    Up,
    Down,
}

impl Trend {
    /// Classify from the presence of a "down" marker in the source cell.
    #[inline]
    pub fn from_down_marker(has_marker: bool) -> Self {
        if has_marker {
            Self::Down
        } else {
            Self::Up
        }
    }

    #[inline]
    pub fn is_down(&self) -> bool {
        matches!(self, Self::Down)
    }

    /// Apply this direction to an unsigned magnitude.
    #[inline]
    pub fn signed(&self, magnitude: Decimal) -> Decimal {
        match self {
            Self::Up => magnitude.abs(),
            Self::Down => -magnitude.abs(),
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
        }
    }
}

/// One asset row as it appeared on the page during a single cycle.
///
/// Text fields keep the page's formatting for display; the parsed numeric
/// counterparts are `None` when the text could not be read as a number.
/// Change values carry the sign implied by their trend flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAssetRecord {
    /// 1-based position in the source table.
    pub rank: usize,
    pub name: String,
    pub price_text: String,
    pub price: Option<Decimal>,
    pub change_1h_text: String,
    pub change_1h: Option<Decimal>,
    pub change_24h_text: String,
    pub change_24h: Option<Decimal>,
    pub market_cap: String,
    pub price_trend: Trend,
    pub trend_1h: Trend,
    pub trend_24h: Trend,
}

/// Text of one numeric cell together with its trend marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendCell {
    pub text: String,
    pub trend: Trend,
}

impl TrendCell {
    pub fn new(text: impl Into<String>, trend: Trend) -> Self {
        Self {
            text: text.into(),
            trend,
        }
    }
}

impl RawAssetRecord {
    /// Build a record from cell texts, parsing the numeric fields.
    pub fn from_cells(
        rank: usize,
        name: impl Into<String>,
        price: TrendCell,
        change_1h: TrendCell,
        change_24h: TrendCell,
        market_cap: impl Into<String>,
    ) -> Self {
        let signed_change =
            |cell: &TrendCell| parse_display_decimal(&cell.text).map(|d| cell.trend.signed(d));

        Self {
            rank,
            name: name.into(),
            price: parse_display_decimal(&price.text),
            change_1h: signed_change(&change_1h),
            change_24h: signed_change(&change_24h),
            market_cap: market_cap.into(),
            price_trend: price.trend,
            trend_1h: change_1h.trend,
            trend_24h: change_24h.trend,
            price_text: price.text,
            change_1h_text: change_1h.text,
            change_24h_text: change_24h.text,
        }
    }

    /// Case-insensitive substring match on the asset name.
    pub fn name_contains(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(&needle.to_lowercase())
    }
}
