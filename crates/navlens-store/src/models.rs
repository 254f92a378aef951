use serde::{Deserialize, Serialize};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

/// `YYYY-MM-DD HH:MM:SS`, the sidecar's timestamp layout.
pub const LAST_UPDATE_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// One persisted NAV row. Dates are kept as `YYYY-MM-DD` strings; the core
/// crate owns the typed representation and converts at the boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheRow {
    pub date: String,
    pub nav: f64,
    pub acc_nav: Option<f64>,
}

/// Inclusive date span of a cached series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

/// Sidecar metadata written alongside every cached series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheMeta {
    /// `YYYY-MM-DD HH:MM:SS`, UTC.
    pub last_update: String,
    pub fund_code: String,
    pub data_count: usize,
    pub date_range: DateRange,
}

impl CacheMeta {
    pub(crate) fn build(fund_code: &str, rows: &[CacheRow], now: OffsetDateTime) -> Self {
        // Lexicographic order on YYYY-MM-DD strings is chronological.
        let start = rows
            .iter()
            .map(|row| row.date.as_str())
            .min()
            .unwrap_or_default()
            .to_owned();
        let end = rows
            .iter()
            .map(|row| row.date.as_str())
            .max()
            .unwrap_or_default()
            .to_owned();

        Self {
            last_update: now
                .format(LAST_UPDATE_FORMAT)
                .unwrap_or_else(|_| String::from("1970-01-01 00:00:00")),
            fund_code: fund_code.to_owned(),
            data_count: rows.len(),
            date_range: DateRange { start, end },
        }
    }

    /// Calendar date of the last update, when parseable.
    pub fn last_update_date(&self) -> Option<Date> {
        let day = self.last_update.get(..10)?;
        Date::parse(day, DATE_FORMAT).ok()
    }

    /// A cache entry is same-day-fresh when it was written on `today`;
    /// it can then be reused verbatim with no remote call. Anything older is
    /// stale and needs an incremental check, even if its date range already
    /// nominally covers today.
    pub fn is_same_day_fresh(&self, today: Date) -> bool {
        self.last_update_date() == Some(today)
    }
}

/// A cached series plus its sidecar metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub rows: Vec<CacheRow>,
    pub meta: CacheMeta,
}
