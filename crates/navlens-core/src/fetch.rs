use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::domain::{FetchWindow, FundCode, FundMetadata, NavSeries};

/// Source-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// The fund exists but the requested range has no published NAV rows,
    /// or the fund code is unknown upstream.
    NoData,
    /// Transport failure where a retry may succeed.
    Transient,
    InvalidRequest,
    Internal,
}

/// Structured fetch error used by the orchestrator to pick a degradation path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    kind: FetchErrorKind,
    message: String,
    retryable: bool,
}

impl FetchError {
    pub fn no_data(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::NoData,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn transient(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::Transient,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::InvalidRequest,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> FetchErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            FetchErrorKind::NoData => "fetch.no_data",
            FetchErrorKind::Transient => "fetch.transient",
            FetchErrorKind::InvalidRequest => "fetch.invalid_request",
            FetchErrorKind::Internal => "fetch.internal",
        }
    }
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for FetchError {}

/// Request payload for NAV history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequest {
    pub fund_code: FundCode,
    /// `None` asks for the full published history.
    pub window: Option<FetchWindow>,
}

impl HistoryRequest {
    pub fn full_history(fund_code: FundCode) -> Self {
        Self {
            fund_code,
            window: None,
        }
    }

    pub fn window(fund_code: FundCode, window: FetchWindow) -> Self {
        Self {
            fund_code,
            window: Some(window),
        }
    }
}

/// Upstream NAV source contract, object-safe so the orchestrator can swap a
/// scripted source in tests for the real adapter.
pub trait NavSource: Send + Sync {
    /// Fetch NAV history. An `Ok` series is never empty; an empty result
    /// surfaces as a `NoData` error instead.
    fn history<'a>(
        &'a self,
        request: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<NavSeries, FetchError>> + Send + 'a>>;

    /// Resolve descriptive metadata. Lookup failures degrade to the
    /// `unknown` placeholder rather than surfacing an error.
    fn lookup<'a>(
        &'a self,
        fund_code: FundCode,
    ) -> Pin<Box<dyn Future<Output = FundMetadata> + Send + 'a>>;
}
