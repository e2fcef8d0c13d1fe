//! Display-ready rows produced by the presentation mapper.

use serde::Serialize;
use std::fmt;

/// Emphasis tag the UI translates into color and weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Emphasis {
    /// Value moved up.
    Positive,
    /// Value moved down.
    Negative,
    /// Highlighted identity text (asset name).
    Accent,
    /// Bold plain text.
    Strong,
}

/// Directional glyph shown in front of a trended value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Glyph {
    Up,
    Down,
}

impl Glyph {
    pub const fn as_char(&self) -> char {
        match self {
            Self::Up => '△',
            Self::Down => '▽',
        }
    }
}

impl fmt::Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// One formatted table cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderCell {
    pub text: String,
    pub emphasis: Emphasis,
    pub glyph: Option<Glyph>,
}

impl RenderCell {
    pub fn plain(text: impl Into<String>, emphasis: Emphasis) -> Self {
        Self {
            text: text.into(),
            emphasis,
            glyph: None,
        }
    }

    pub fn with_glyph(text: impl Into<String>, emphasis: Emphasis, glyph: Glyph) -> Self {
        Self {
            text: text.into(),
            emphasis,
            glyph: Some(glyph),
        }
    }

    /// Text as shown on screen, glyph first.
    pub fn display(&self) -> String {
        match self.glyph {
            Some(glyph) => format!("{glyph} {}", self.text),
            None => self.text.clone(),
        }
    }
}

/// One display-ready asset row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderRow {
    pub name: RenderCell,
    pub price: RenderCell,
    pub change_1h: RenderCell,
    pub change_24h: RenderCell,
    pub market_cap: RenderCell,
}

impl RenderRow {
    /// Column headers, in cell order.
    pub const HEADERS: [&'static str; 5] = ["NAME", "PRICE", "1h%", "24h%", "MARKET CAP"];

    /// Cells in column order.
    pub fn cells(&self) -> [&RenderCell; 5] {
        [
            &self.name,
            &self.price,
            &self.change_1h,
            &self.change_24h,
            &self.market_cap,
        ]
    }
}
