use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] navlens_core::ValidationError),

    #[error(transparent)]
    Metrics(#[from] navlens_metrics::MetricsError),

    #[error("command error: {0}")]
    Command(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Metrics(_) | Self::Command(_) | Self::Serialization(_) | Self::Io(_) => 10,
        }
    }
}
