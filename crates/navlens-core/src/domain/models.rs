use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::Duration;

use crate::domain::{CalendarDate, FundCode};
use crate::ValidationError;

/// Placeholder used when fund metadata cannot be resolved.
pub const UNKNOWN_FIELD: &str = "unknown";

/// One published NAV observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NavRecord {
    pub date: CalendarDate,
    pub nav: f64,
    pub acc_nav: Option<f64>,
}

impl NavRecord {
    pub fn new(
        date: CalendarDate,
        nav: f64,
        acc_nav: Option<f64>,
    ) -> Result<Self, ValidationError> {
        if !nav.is_finite() {
            return Err(ValidationError::NonFiniteValue { field: "nav" });
        }
        if let Some(acc) = acc_nav {
            if !acc.is_finite() {
                return Err(ValidationError::NonFiniteValue { field: "acc_nav" });
            }
        }

        Ok(Self { date, nav, acc_nav })
    }
}

/// Date-ordered NAV history for one fund, at most one record per date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavSeries {
    fund_code: FundCode,
    records: Vec<NavRecord>,
}

impl NavSeries {
    pub fn empty(fund_code: FundCode) -> Self {
        Self {
            fund_code,
            records: Vec::new(),
        }
    }

    /// Build a series from unordered records. Later duplicates of a date win.
    pub fn from_records(fund_code: FundCode, records: Vec<NavRecord>) -> Self {
        let mut by_date: BTreeMap<CalendarDate, NavRecord> = BTreeMap::new();
        for record in records {
            by_date.insert(record.date, record);
        }

        Self {
            fund_code,
            records: by_date.into_values().collect(),
        }
    }

    pub fn fund_code(&self) -> &FundCode {
        &self.fund_code
    }

    pub fn records(&self) -> &[NavRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn date_range(&self) -> Option<(CalendarDate, CalendarDate)> {
        match (self.records.first(), self.records.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        }
    }

    pub fn navs(&self) -> Vec<f64> {
        self.records.iter().map(|record| record.nav).collect()
    }

    pub fn dates(&self) -> Vec<CalendarDate> {
        self.records.iter().map(|record| record.date).collect()
    }

    /// Merge freshly fetched records into the series. Where both sides carry
    /// the same date, the fresh record replaces the cached one.
    pub fn merge(&mut self, fresh: NavSeries) {
        let mut combined = std::mem::take(&mut self.records);
        combined.extend(fresh.records);
        *self = Self::from_records(self.fund_code.clone(), combined);
    }

    /// Records with dates in `[start, end]`, inclusive on both ends.
    pub fn window(&self, start: CalendarDate, end: CalendarDate) -> NavSeries {
        let records = self
            .records
            .iter()
            .filter(|record| record.date >= start && record.date <= end)
            .copied()
            .collect();

        Self {
            fund_code: self.fund_code.clone(),
            records,
        }
    }

    /// Expand to one record per calendar day, carrying the last published
    /// value forward across non-trading days.
    pub fn fill_missing(&self) -> NavSeries {
        let Some((start, end)) = self.date_range() else {
            return self.clone();
        };

        let mut filled = Vec::with_capacity(self.records.len());
        let mut source = self.records.iter().peekable();
        let mut current = self.records[0];
        let mut day = start;
        loop {
            if let Some(next) = source.peek() {
                if next.date == day {
                    current = **next;
                    source.next();
                }
            }
            filled.push(NavRecord { date: day, ..current });

            if day == end {
                break;
            }
            match day.next_day() {
                Some(next_day) => day = next_day,
                None => break,
            }
        }

        Self {
            fund_code: self.fund_code.clone(),
            records: filled,
        }
    }
}

/// Descriptive fund attributes resolved from the search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundMetadata {
    pub fund_code: FundCode,
    pub fund_name: String,
    pub fund_company: String,
    pub fund_type: String,
    pub is_money_fund: bool,
}

impl FundMetadata {
    /// Degraded metadata when the lookup fails or finds no match.
    pub fn unknown(fund_code: FundCode) -> Self {
        Self {
            fund_code,
            fund_name: UNKNOWN_FIELD.to_owned(),
            fund_company: UNKNOWN_FIELD.to_owned(),
            fund_type: UNKNOWN_FIELD.to_owned(),
            is_money_fund: false,
        }
    }
}

/// Inclusive date window for a history fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
    pub start: CalendarDate,
    pub end: CalendarDate,
}

impl FetchWindow {
    pub fn new(start: CalendarDate, end: CalendarDate) -> Result<Self, ValidationError> {
        if start > end {
            return Err(ValidationError::WindowOrder {
                start: start.format_iso(),
                end: end.format_iso(),
            });
        }

        Ok(Self { start, end })
    }

    /// Number of calendar days covered, inclusive of both bounds.
    pub fn span_days(&self) -> i64 {
        self.start.days_until(self.end) + 1
    }

    /// Split into consecutive windows of at most `max_days` calendar days.
    pub fn split(&self, max_days: i64) -> Vec<FetchWindow> {
        debug_assert!(max_days > 0);

        let mut windows = Vec::new();
        let mut cursor = self.start;
        while cursor <= self.end {
            let candidate =
                CalendarDate::from_date(cursor.into_inner() + Duration::days(max_days - 1));
            let sub_end = candidate.min(self.end);
            windows.push(FetchWindow {
                start: cursor,
                end: sub_end,
            });

            match sub_end.next_day() {
                Some(next) => cursor = next,
                None => break,
            }
        }

        windows
    }
}
