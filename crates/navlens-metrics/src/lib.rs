//! # Navlens Metrics
//!
//! Pure performance and risk metrics over fund NAV series.
//!
//! ## Overview
//!
//! Every function here is a pure computation over a slice of NAV values
//! (paired with dates where period bucketing or calendar spans matter).
//! Nothing in this crate performs I/O; callers obtain series from
//! `navlens-core` and hand the values in.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`returns`] | Daily, annualized, and period-resampled returns |
//! | [`risk`] | Max drawdown, annualized volatility, Sharpe ratio |
//! | [`distribution`] | Daily-return distribution statistics and percentiles |
//! | [`money`] | Money-market 7-day annualized yields (per-10,000-share) |
//! | [`window`] | Metrics over an arbitrary start/end sub-period |
//!
//! ## Units
//!
//! Percentage-valued outputs are expressed as percentages (already ×100):
//! a 2.5% annualized return is returned as `2.5`, not `0.025`.
//!
//! ## Insufficient data
//!
//! A window with too few observations for a metric yields
//! [`MetricsError::InsufficientData`] instead of `NaN` or a silent zero, so
//! callers can distinguish "no answer" from "zero". A series whose daily
//! returns are not finite (a zero NAV row divides by zero) yields
//! [`MetricsError::NonFiniteReturn`] for the same reason.

pub mod distribution;
pub mod error;
pub mod money;
pub mod returns;
pub mod risk;
pub mod window;

pub use distribution::{return_distribution, Percentile, ReturnDistribution};
pub use error::MetricsError;
pub use money::{
    rolling_seven_day_annualized, rolling_yield_max, rolling_yield_min, seven_day_annualized,
    YieldExtreme,
};
pub use returns::{annualized_return, daily_returns, period_returns, Period, PeriodReturn};
pub use risk::{max_drawdown, sharpe_ratio, volatility};
pub use window::{
    money_window_metrics, standard_window_metrics, MoneyWindowMetrics, StandardWindowMetrics,
};

/// Trading days per year used for annualization of standard funds.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Calendar days per year used for annualization of money-market yields.
pub const CALENDAR_DAYS_PER_YEAR: f64 = 365.0;

/// Default risk-free rate for the Sharpe ratio.
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.03;

pub(crate) fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (ddof = 1).
pub(crate) fn sample_std(values: &[f64]) -> f64 {
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    (sum_sq / (values.len() as f64 - 1.0)).sqrt()
}
