//! Feed error types.

use std::fmt;

use thiserror::Error;

/// Failure to retrieve the market page. No partial markup is ever returned.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP client error: {0}")]
    Client(String),

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Failed to read response body: {0}")]
    Body(String),
}

pub type FetchResult<T> = Result<T, FetchError>;

/// Named column of the asset table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetField {
    Name,
    Price,
    Change1h,
    Change24h,
    MarketCap,
}

impl fmt::Display for AssetField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Name => "name",
            Self::Price => "price",
            Self::Change1h => "1h change",
            Self::Change24h => "24h change",
            Self::MarketCap => "market cap",
        };
        f.write_str(name)
    }
}

/// The page no longer has the shape the extractor expects.
///
/// Each variant names the structural element that went missing so markup
/// drift upstream is reported specifically.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Data table not found (selector '{selector}')")]
    TableNotFound { selector: String },

    #[error("Data table has no body")]
    BodyNotFound,

    #[error("Row {row}: {field} cell missing (expected at index {index}, row has {found} cells)")]
    MissingCell {
        row: usize,
        field: AssetField,
        index: usize,
        found: usize,
    },

    #[error("Row {row}: {field} cell has no <{element}> element")]
    MissingElement {
        row: usize,
        field: AssetField,
        element: &'static str,
    },

    #[error("Row {row}: {field} is empty")]
    EmptyField { row: usize, field: AssetField },

    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },
}

pub type ParseResult<T> = Result<T, ParseError>;
