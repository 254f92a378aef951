//! Cache-first orchestrator tying the store and the upstream source together.
//!
//! Resolution order for a series request:
//!
//! 1. no cache entry: fetch the full history, persist it;
//! 2. entry written today (UTC): serve it without touching the network;
//! 3. stale entry: fetch only `[last cached date + 1, today]`, merge with
//!    fresh rows winning on date collisions, persist the merged series.
//!
//! Every failure path degrades to the best series available, down to an
//! empty one; callers never see a fetch error.

use std::sync::Arc;

use tracing::{debug, warn};

use navlens_store::{CacheRow, CacheStore};

use crate::domain::{CalendarDate, FetchWindow, FundCode, FundMetadata, NavRecord, NavSeries};
use crate::fetch::{FetchErrorKind, HistoryRequest, NavSource};

pub struct NavService {
    source: Arc<dyn NavSource>,
    store: CacheStore,
}

impl NavService {
    pub fn new(source: Arc<dyn NavSource>, store: CacheStore) -> Self {
        Self { source, store }
    }

    /// NAV history for a fund, served from cache when fresh.
    ///
    /// With `fill_missing` the series is expanded to one record per calendar
    /// day by carrying the last published value forward.
    pub async fn get_series(&self, fund_code: &FundCode, fill_missing: bool) -> NavSeries {
        self.get_series_as_of(fund_code, fill_missing, CalendarDate::today_utc())
            .await
    }

    /// Same as [`get_series`](Self::get_series) with an explicit notion of
    /// "today", which pins freshness decisions in tests.
    pub async fn get_series_as_of(
        &self,
        fund_code: &FundCode,
        fill_missing: bool,
        today: CalendarDate,
    ) -> NavSeries {
        let series = self.resolve_series(fund_code, today).await;
        if fill_missing && !series.is_empty() {
            series.fill_missing()
        } else {
            series
        }
    }

    pub async fn get_metadata(&self, fund_code: &FundCode) -> FundMetadata {
        self.source.lookup(fund_code.clone()).await
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    async fn resolve_series(&self, fund_code: &FundCode, today: CalendarDate) -> NavSeries {
        let cached = match self.store.read(fund_code.as_str()) {
            Ok(entry) => entry,
            Err(err) => {
                warn!(fund_code = fund_code.as_str(), error = %err, "cache read failed");
                None
            }
        };

        let Some(entry) = cached else {
            return self.fetch_full(fund_code).await;
        };

        let mut series = series_from_rows(fund_code.clone(), &entry.rows);
        let Some((_, last_cached)) = series.date_range() else {
            // Rows all failed validation; treat the entry as corrupt.
            warn!(fund_code = fund_code.as_str(), "cached rows unusable, refetching");
            self.store.invalidate(fund_code.as_str());
            return self.fetch_full(fund_code).await;
        };

        if entry.meta.is_same_day_fresh(today.into_inner()) {
            debug!(fund_code = fund_code.as_str(), "cache fresh, skipping fetch");
            return series;
        }

        if last_cached >= today {
            debug!(fund_code = fund_code.as_str(), "cache already spans today");
            return series;
        }

        let Some(gap_start) = last_cached.next_day() else {
            return series;
        };
        let window = match FetchWindow::new(gap_start, today) {
            Ok(window) => window,
            Err(err) => {
                warn!(fund_code = fund_code.as_str(), error = %err, "bad incremental window");
                return series;
            }
        };

        match self
            .source
            .history(HistoryRequest::window(fund_code.clone(), window))
            .await
        {
            Ok(fresh) => {
                series.merge(fresh);
                self.persist(&series);
            }
            Err(err) if err.kind() == FetchErrorKind::NoData => {
                debug!(fund_code = fund_code.as_str(), "no rows published since last cache");
            }
            Err(err) => {
                warn!(
                    fund_code = fund_code.as_str(),
                    error = %err,
                    "incremental fetch failed, serving stale cache"
                );
            }
        }

        series
    }

    async fn fetch_full(&self, fund_code: &FundCode) -> NavSeries {
        match self
            .source
            .history(HistoryRequest::full_history(fund_code.clone()))
            .await
        {
            Ok(series) => {
                self.persist(&series);
                series
            }
            Err(err) => {
                warn!(fund_code = fund_code.as_str(), error = %err, "history fetch failed");
                NavSeries::empty(fund_code.clone())
            }
        }
    }

    fn persist(&self, series: &NavSeries) {
        if series.is_empty() {
            return;
        }
        let rows = rows_from_series(series);
        if let Err(err) = self.store.write(series.fund_code().as_str(), &rows) {
            warn!(
                fund_code = series.fund_code().as_str(),
                error = %err,
                "cache write failed, continuing with in-memory series"
            );
        }
    }
}

/// Decode cached rows, dropping any that no longer validate.
fn series_from_rows(fund_code: FundCode, rows: &[CacheRow]) -> NavSeries {
    let records = rows
        .iter()
        .filter_map(|row| {
            let date = CalendarDate::parse(&row.date).ok()?;
            NavRecord::new(date, row.nav, row.acc_nav).ok()
        })
        .collect();

    NavSeries::from_records(fund_code, records)
}

fn rows_from_series(series: &NavSeries) -> Vec<CacheRow> {
    series
        .records()
        .iter()
        .map(|record| CacheRow {
            date: record.date.format_iso(),
            nav: record.nav,
            acc_nav: record.acc_nav,
        })
        .collect()
}
