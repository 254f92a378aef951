//! Source adapters for upstream fund-data endpoints.

mod eastmoney;

pub use eastmoney::{
    EastmoneyAdapter, DEFAULT_PAGE_SIZE, HISTORY_ENDPOINT, MAX_WINDOW_DAYS, SEARCH_ENDPOINT,
};
