//! Validated domain types shared across the workspace.

mod date;
mod fund_code;
mod models;

pub use date::CalendarDate;
pub use fund_code::FundCode;
pub use models::{FetchWindow, FundMetadata, NavRecord, NavSeries, UNKNOWN_FIELD};
