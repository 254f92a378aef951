//! Distribution statistics over daily returns.

use serde::Serialize;

use crate::error::MetricsError;
use crate::returns::{daily_returns, ensure_finite};
use crate::{mean, sample_std};

/// Percentile levels reported by [`return_distribution`].
pub const PERCENTILE_LEVELS: [u8; 8] = [1, 5, 10, 25, 75, 90, 95, 99];

/// One percentile of the daily-return distribution, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Percentile {
    pub level: u8,
    pub value: f64,
}

/// Summary statistics of the daily-return distribution. All return-valued
/// fields are in percent; skew and kurtosis are dimensionless.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnDistribution {
    pub mean: f64,
    pub std: f64,
    /// Sample-adjusted (Fisher-Pearson) skewness.
    pub skew: f64,
    /// Sample-adjusted excess kurtosis (normal distribution → 0).
    pub kurtosis: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    pub percentiles: Vec<Percentile>,
}

/// Compute the daily-return distribution of a NAV series.
///
/// The sample-adjusted kurtosis estimator needs at least four returns, so
/// the series must hold at least five observations.
pub fn return_distribution(navs: &[f64]) -> Result<ReturnDistribution, MetricsError> {
    if navs.len() < 5 {
        return Err(MetricsError::insufficient(5, navs.len()));
    }

    let returns = daily_returns(navs);
    ensure_finite(&returns)?;
    let n = returns.len() as f64;
    let m = mean(&returns);
    let s = sample_std(&returns);

    let m3: f64 = returns.iter().map(|r| ((r - m) / s).powi(3)).sum();
    let skew = n / ((n - 1.0) * (n - 2.0)) * m3;

    let m4: f64 = returns.iter().map(|r| ((r - m) / s).powi(4)).sum();
    let kurtosis = n * (n + 1.0) / ((n - 1.0) * (n - 2.0) * (n - 3.0)) * m4
        - 3.0 * (n - 1.0) * (n - 1.0) / ((n - 2.0) * (n - 3.0));

    let mut sorted = returns.clone();
    sorted.sort_by(f64::total_cmp);

    let percentiles = PERCENTILE_LEVELS
        .iter()
        .map(|&level| Percentile {
            level,
            value: percentile(&sorted, f64::from(level)) * 100.0,
        })
        .collect();

    Ok(ReturnDistribution {
        mean: m * 100.0,
        std: s * 100.0,
        skew,
        kurtosis,
        min: sorted[0] * 100.0,
        max: sorted[sorted.len() - 1] * 100.0,
        median: percentile(&sorted, 50.0) * 100.0,
        percentiles,
    })
}

/// Linear-interpolation percentile over a sorted slice.
fn percentile(sorted: &[f64], level: f64) -> f64 {
    let rank = level / 100.0 * (sorted.len() as f64 - 1.0);
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentile_interpolates_linearly() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(percentile(&sorted, 0.0), 1.0);
        assert_eq!(percentile(&sorted, 100.0), 4.0);
        assert_eq!(percentile(&sorted, 50.0), 2.5);
        assert!((percentile(&sorted, 25.0) - 1.75).abs() < 1e-12);
    }

    #[test]
    fn distribution_reports_bounds_and_median() {
        // Alternating +1% / -1% daily returns.
        let mut navs = vec![1.0];
        for i in 0..6 {
            let last = *navs.last().expect("non-empty");
            let r = if i % 2 == 0 { 0.01 } else { -0.01 };
            navs.push(last * (1.0 + r));
        }
        let dist = return_distribution(&navs).expect("enough data");
        assert!((dist.max - 1.0).abs() < 1e-9);
        assert!((dist.min - (-1.0)).abs() < 1e-9);
        assert!(dist.min <= dist.median && dist.median <= dist.max);
        assert_eq!(dist.percentiles.len(), 8);
    }

    #[test]
    fn symmetric_returns_have_near_zero_skew() {
        let mut navs = vec![1.0];
        for i in 0..20 {
            let last = *navs.last().expect("non-empty");
            let r = if i % 2 == 0 { 0.01 } else { -0.01 };
            navs.push(last * (1.0 + r));
        }
        let dist = return_distribution(&navs).expect("enough data");
        assert!(dist.skew.abs() < 0.1, "skew = {}", dist.skew);
    }

    #[test]
    fn zero_nav_rows_are_rejected_instead_of_panicking() {
        // 0.0/0.0 at the second return; the series must be refused, not
        // sorted with a NaN inside.
        let err = return_distribution(&[1.0, 0.0, 0.0, 1.0, 1.1, 1.2]).expect_err("must fail");
        assert_eq!(err, MetricsError::NonFiniteReturn { index: 1 });
    }

    #[test]
    fn short_series_is_rejected() {
        let err = return_distribution(&[1.0, 1.1, 1.2, 1.3]).expect_err("must fail");
        assert_eq!(err, MetricsError::InsufficientData { needed: 5, got: 4 });
    }
}
