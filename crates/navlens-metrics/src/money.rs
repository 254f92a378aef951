//! Money-market fund yields.
//!
//! For money-market funds the NAV field carries the daily yield per 10,000
//! shares, not a unit price. The 7-day annualized yield sums the last seven
//! daily yields, divides by 10,000 to get the cumulative 7-day return, and
//! annualizes by compounding over 365/7 periods.

use serde::Serialize;

use crate::error::MetricsError;
use crate::CALENDAR_DAYS_PER_YEAR;

const ROLLING_WINDOW: usize = 7;
const SHARE_BASE: f64 = 10_000.0;

/// 7-day annualized yield in percent from per-10,000-share daily yields,
/// using the last seven entries of the slice.
pub fn seven_day_annualized(yields: &[f64]) -> Result<f64, MetricsError> {
    if yields.len() < ROLLING_WINDOW {
        return Err(MetricsError::InsufficientData {
            needed: ROLLING_WINDOW,
            got: yields.len(),
        });
    }
    let sum: f64 = yields[yields.len() - ROLLING_WINDOW..].iter().sum();
    Ok(annualize_seven_day_sum(sum))
}

/// Rolling 7-day annualized yield series, aligned with the input: entries
/// before the window fills (indices 0..6) are `None`.
pub fn rolling_seven_day_annualized(yields: &[f64]) -> Result<Vec<Option<f64>>, MetricsError> {
    if yields.len() < ROLLING_WINDOW {
        return Err(MetricsError::InsufficientData {
            needed: ROLLING_WINDOW,
            got: yields.len(),
        });
    }

    let mut out = vec![None; ROLLING_WINDOW - 1];
    let mut sum: f64 = yields[..ROLLING_WINDOW - 1].iter().sum();
    for i in ROLLING_WINDOW - 1..yields.len() {
        sum += yields[i];
        out.push(Some(annualize_seven_day_sum(sum)));
        sum -= yields[i + 1 - ROLLING_WINDOW];
    }
    Ok(out)
}

/// A historical extreme of the rolling yield series: where and how much.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YieldExtreme {
    /// Index into the series the rolling values were computed from.
    pub index: usize,
    /// Annualized yield in percent.
    pub value: f64,
}

/// Highest rolling 7-day annualized yield, if any window has filled.
pub fn rolling_yield_max(rolling: &[Option<f64>]) -> Option<YieldExtreme> {
    fold_extreme(rolling, |best, candidate| candidate > best)
}

/// Lowest rolling 7-day annualized yield, if any window has filled.
pub fn rolling_yield_min(rolling: &[Option<f64>]) -> Option<YieldExtreme> {
    fold_extreme(rolling, |best, candidate| candidate < best)
}

fn fold_extreme(
    rolling: &[Option<f64>],
    better: impl Fn(f64, f64) -> bool,
) -> Option<YieldExtreme> {
    let mut extreme: Option<YieldExtreme> = None;
    for (index, value) in rolling.iter().enumerate() {
        let Some(value) = *value else { continue };
        match extreme {
            Some(current) if !better(current.value, value) => {}
            _ => extreme = Some(YieldExtreme { index, value }),
        }
    }
    extreme
}

fn annualize_seven_day_sum(sum: f64) -> f64 {
    let cumulative = sum / SHARE_BASE;
    ((1.0 + cumulative).powf(CALENDAR_DAYS_PER_YEAR / ROLLING_WINDOW as f64) - 1.0) * 100.0
}
