//! Metrics over an arbitrary start/end sub-period of a series.
//!
//! Standard funds annualize by trading days (252/year); money-market funds
//! annualize the window's cumulative per-10,000-share yield by calendar days
//! (365/year). Trading days is the row count of the window. Calendar days is
//! the inclusive span of the *requested* start and end dates, not of the rows
//! that happen to fall inside them, so a window opening on a Saturday still
//! counts the weekend.

use serde::Serialize;
use time::Date;

use crate::error::MetricsError;
use crate::returns::{daily_returns, ensure_finite};
use crate::risk::max_drawdown;
use crate::{mean, CALENDAR_DAYS_PER_YEAR, TRADING_DAYS_PER_YEAR};

/// Window metrics for a standard (unit-price) fund.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandardWindowMetrics {
    pub trading_days: usize,
    pub calendar_days: i64,
    pub start_nav: f64,
    pub end_nav: f64,
    /// `end/start - 1`, percent.
    pub cumulative_return: f64,
    /// Compounded over `252/trading_days`, percent.
    pub annualized_return: f64,
    /// Std of daily returns over the window, percent (not annualized).
    pub volatility: f64,
    /// Magnitude of the worst peak-to-trough decline, percent (≥ 0).
    pub max_drawdown: f64,
}

/// Window metrics for a money-market fund.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoneyWindowMetrics {
    pub trading_days: usize,
    pub calendar_days: i64,
    /// Σ daily yields / 10,000, percent.
    pub cumulative_return: f64,
    /// Compounded over `365/calendar_days`, percent.
    pub annualized_return: f64,
}

/// Compute standard-fund metrics over a window. `start` and `end` are the
/// requested bounds (inclusive); `navs` holds the rows that fell inside them,
/// at least two of which are required.
pub fn standard_window_metrics(
    start: Date,
    end: Date,
    navs: &[f64],
) -> Result<StandardWindowMetrics, MetricsError> {
    if navs.len() < 2 {
        return Err(MetricsError::insufficient(2, navs.len()));
    }

    let trading_days = navs.len();
    let calendar_days = calendar_span(start, end);

    let cumulative = navs[trading_days - 1] / navs[0] - 1.0;
    let annualized =
        ((1.0 + cumulative).powf(TRADING_DAYS_PER_YEAR / trading_days as f64) - 1.0) * 100.0;

    // Deviations are summed over the trading_days - 1 daily returns and
    // divided by the same count, matching the reference definition
    // √(Σ(r - r̄)² / (trading_days - 1)).
    let returns = daily_returns(navs);
    ensure_finite(&returns)?;
    let r_mean = mean(&returns);
    let sum_sq: f64 = returns.iter().map(|r| (r - r_mean) * (r - r_mean)).sum();
    let volatility = (sum_sq / (trading_days as f64 - 1.0)).sqrt() * 100.0;

    let drawdown = max_drawdown(navs)?.abs();

    Ok(StandardWindowMetrics {
        trading_days,
        calendar_days,
        start_nav: navs[0],
        end_nav: navs[trading_days - 1],
        cumulative_return: cumulative * 100.0,
        annualized_return: annualized,
        volatility,
        max_drawdown: drawdown,
    })
}

/// Compute money-market metrics over a window of per-10,000-share daily
/// yields. `start` and `end` are the requested bounds (inclusive).
pub fn money_window_metrics(
    start: Date,
    end: Date,
    yields: &[f64],
) -> Result<MoneyWindowMetrics, MetricsError> {
    if yields.is_empty() {
        return Err(MetricsError::insufficient(1, 0));
    }

    let trading_days = yields.len();
    let calendar_days = calendar_span(start, end);

    let cumulative = yields.iter().sum::<f64>() / 10_000.0 * 100.0;
    let annualized = ((1.0 + cumulative / 100.0)
        .powf(CALENDAR_DAYS_PER_YEAR / calendar_days as f64)
        - 1.0)
        * 100.0;

    Ok(MoneyWindowMetrics {
        trading_days,
        calendar_days,
        cumulative_return: cumulative,
        annualized_return: annualized,
    })
}

fn calendar_span(start: Date, end: Date) -> i64 {
    i64::from(end.to_julian_day() - start.to_julian_day()) + 1
}
