use thiserror::Error;

/// Errors surfaced by metric computations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MetricsError {
    /// The analysis window holds too few observations for the metric.
    #[error("insufficient data: metric needs at least {needed} observations, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Parallel date/value slices disagree in length.
    #[error("dates ({dates}) and values ({values}) must have equal length")]
    LengthMismatch { dates: usize, values: usize },

    /// A daily return came out NaN or infinite, typically from a zero NAV row.
    #[error("daily return at index {index} is not finite")]
    NonFiniteReturn { index: usize },
}

impl MetricsError {
    pub(crate) fn insufficient(needed: usize, got: usize) -> Self {
        Self::InsufficientData { needed, got }
    }
}
