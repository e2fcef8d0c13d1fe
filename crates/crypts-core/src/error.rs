//! Error types for crypts-core.

use thiserror::Error;

/// Rejected user input for a numeric view field.
///
/// The previous valid value is always retained when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterInputError {
    #[error("{field}: '{input}' is not a number")]
    NotANumber { field: &'static str, input: String },

    #[error("{field}: must be greater than zero (got {input})")]
    NotPositive { field: &'static str, input: String },

    #[error("{field}: must not be negative (got {input})")]
    Negative { field: &'static str, input: String },

    #[error("{field}: must be at most {max} (got {input})")]
    TooLarge {
        field: &'static str,
        input: String,
        max: u64,
    },
}

impl FilterInputError {
    /// Name of the field the rejected input was meant for.
    pub fn field(&self) -> &'static str {
        match self {
            Self::NotANumber { field, .. }
            | Self::NotPositive { field, .. }
            | Self::Negative { field, .. }
            | Self::TooLarge { field, .. } => field,
        }
    }
}

/// Result type alias for input validation.
pub type InputResult<T> = std::result::Result<T, FilterInputError>;
