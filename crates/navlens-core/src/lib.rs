//! Core contracts for navlens.
//!
//! This crate contains:
//! - Canonical domain models and validation
//! - The NAV source trait and the Eastmoney adapter
//! - The lsjz payload parser and request pacing
//! - The cache-first orchestrator over `navlens-store`

pub mod adapters;
pub mod domain;
pub mod error;
pub mod fetch;
pub mod http_client;
pub mod pacing;
pub mod parse;
pub mod service;

pub use adapters::{
    EastmoneyAdapter, DEFAULT_PAGE_SIZE, HISTORY_ENDPOINT, MAX_WINDOW_DAYS, SEARCH_ENDPOINT,
};
pub use domain::{
    CalendarDate, FetchWindow, FundCode, FundMetadata, NavRecord, NavSeries, UNKNOWN_FIELD,
};
pub use error::ValidationError;
pub use fetch::{FetchError, FetchErrorKind, HistoryRequest, NavSource};
pub use http_client::{
    HttpClient, HttpError, HttpRequest, HttpResponse, NoopHttpClient, ReqwestHttpClient,
    DEFAULT_TIMEOUT_MS,
};
pub use navlens_store::{CacheEntry, CacheMeta, CacheRow, CacheStore, DateRange, StoreError};
pub use pacing::FetchPacer;
pub use parse::{parse_history_page, NavPage, ParseFailure, NO_DATA_MARKER};
pub use service::NavService;
