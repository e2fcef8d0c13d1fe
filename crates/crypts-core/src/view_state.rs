//! User-adjustable view state: filters and refresh cadence.
//!
//! Text setters validate raw input from the UI and leave the current value
//! untouched when they return an error.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{FilterInputError, InputResult};
use crate::numeric::parse_display_decimal;

pub const DEFAULT_DELAY_SECS: u64 = 5;
pub const DEFAULT_ROW_LIMIT: usize = 10;

/// Longest accepted refresh delay: one day.
pub const MAX_DELAY_SECS: u64 = 86_400;

/// Filter predicates applied to every cycle's records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Keep only the first N rows (0 = unlimited).
    #[serde(default = "default_row_limit")]
    pub row_limit: usize,
    /// Case-insensitive name substring.
    #[serde(default)]
    pub name_substring: Option<String>,
    /// Exclusive lower price bound.
    #[serde(default)]
    pub min_price: Option<Decimal>,
    /// Exclusive upper price bound.
    #[serde(default)]
    pub max_price: Option<Decimal>,
}

fn default_row_limit() -> usize {
    DEFAULT_ROW_LIMIT
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            row_limit: default_row_limit(),
            name_substring: None,
            min_price: None,
            max_price: None,
        }
    }
}

impl FilterConfig {
    /// Whether any name or price predicate is active.
    pub fn has_predicates(&self) -> bool {
        self.name_substring.is_some() || self.min_price.is_some() || self.max_price.is_some()
    }

    pub fn set_row_limit(&mut self, input: &str) -> InputResult<()> {
        self.row_limit = parse_row_limit(input)?;
        Ok(())
    }

    /// Empty or whitespace-only input clears the name filter.
    pub fn set_name_filter(&mut self, input: &str) {
        let trimmed = input.trim();
        self.name_substring = (!trimmed.is_empty()).then(|| trimmed.to_string());
    }

    pub fn set_min_price(&mut self, input: &str) -> InputResult<()> {
        self.min_price = parse_price_bound("min_price", input)?;
        Ok(())
    }

    pub fn set_max_price(&mut self, input: &str) -> InputResult<()> {
        self.max_price = parse_price_bound("max_price", input)?;
        Ok(())
    }

    /// Bring bounds that did not come through the setters (config files)
    /// in line with them: zero becomes "no bound", negatives are rejected.
    pub fn normalize_price_bounds(&mut self) -> InputResult<()> {
        self.min_price = check_price_bound("min_price", self.min_price)?;
        self.max_price = check_price_bound("max_price", self.max_price)?;
        Ok(())
    }
}

/// Auto-refresh toggle and cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshState {
    #[serde(default)]
    pub enabled: bool,
    /// Seconds between cycles; always positive.
    #[serde(default = "default_delay_secs")]
    pub delay_secs: u64,
}

fn default_delay_secs() -> u64 {
    DEFAULT_DELAY_SECS
}

impl Default for RefreshState {
    fn default() -> Self {
        Self {
            enabled: false,
            delay_secs: default_delay_secs(),
        }
    }
}

impl RefreshState {
    pub fn set_delay(&mut self, input: &str) -> InputResult<()> {
        self.delay_secs = parse_delay_secs(input)?;
        Ok(())
    }
}

/// Everything a cycle needs to know about the user's view.
///
/// Cloned as a whole at cycle start so edits made while a cycle is in
/// flight only affect the next one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub refresh: RefreshState,
}

/// Parse a refresh delay in whole seconds.
///
/// Rejects zero, negatives and anything above [`MAX_DELAY_SECS`].
pub fn parse_delay_secs(input: &str) -> InputResult<u64> {
    let value = parse_integer("delay", input)?;
    let input = input.trim();
    if value <= 0 {
        return Err(FilterInputError::NotPositive {
            field: "delay",
            input: input.to_string(),
        });
    }
    match u64::try_from(value) {
        Ok(secs) if secs <= MAX_DELAY_SECS => Ok(secs),
        _ => Err(FilterInputError::TooLarge {
            field: "delay",
            input: input.to_string(),
            max: MAX_DELAY_SECS,
        }),
    }
}

/// Parse a row limit. Zero means unlimited; negatives are rejected.
pub fn parse_row_limit(input: &str) -> InputResult<usize> {
    let value = parse_integer("rows", input)?;
    if value < 0 {
        return Err(FilterInputError::Negative {
            field: "rows",
            input: input.trim().to_string(),
        });
    }
    Ok(value as usize)
}

/// Parse an optional price bound. Empty input and zero both mean "no bound".
pub fn parse_price_bound(field: &'static str, input: &str) -> InputResult<Option<Decimal>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value = parse_display_decimal(trimmed).ok_or_else(|| FilterInputError::NotANumber {
        field,
        input: trimmed.to_string(),
    })?;

    if value.is_sign_negative() && !value.is_zero() {
        return Err(FilterInputError::Negative {
            field,
            input: trimmed.to_string(),
        });
    }

    Ok((!value.is_zero()).then_some(value))
}

fn check_price_bound(field: &'static str, bound: Option<Decimal>) -> InputResult<Option<Decimal>> {
    match bound {
        Some(value) if value.is_zero() => Ok(None),
        Some(value) if value.is_sign_negative() => Err(FilterInputError::Negative {
            field,
            input: value.to_string(),
        }),
        other => Ok(other),
    }
}

fn parse_integer(field: &'static str, input: &str) -> InputResult<i64> {
    let trimmed = input.trim();
    trimmed
        .parse::<i64>()
        .map_err(|_| FilterInputError::NotANumber {
            field,
            input: trimmed.to_string(),
        })
}
