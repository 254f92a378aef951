use thiserror::Error;

/// Validation and contract errors exposed by `navlens-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("fund code cannot be empty")]
    EmptyFundCode,
    #[error("fund code must be exactly {expected} digits, got {len}")]
    FundCodeLength { len: usize, expected: usize },
    #[error("fund code contains invalid character '{ch}' at index {index}")]
    FundCodeInvalidChar { ch: char, index: usize },

    #[error("invalid calendar date, expected YYYY-MM-DD: '{value}'")]
    InvalidDate { value: String },

    #[error("window start {start} is after end {end}")]
    WindowOrder { start: String, end: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
}
