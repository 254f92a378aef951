use thiserror::Error;

/// Errors surfaced by cache reads and writes.
///
/// Corrupt persisted entries never surface here: the store self-heals by
/// deleting them and reporting the entry as absent.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cache io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache data error: {0}")]
    Data(#[from] csv::Error),

    #[error("cache meta error: {0}")]
    Meta(#[from] serde_json::Error),

    #[error("refusing to cache an empty series for '{fund_code}'")]
    EmptyWrite { fund_code: String },
}
