//! Max drawdown, annualized volatility, and Sharpe ratio.

use crate::error::MetricsError;
use crate::returns::{daily_returns, ensure_finite};
use crate::{mean, sample_std};

/// Maximum drawdown in percent: the most negative value of
/// `(nav[t] - running_max[t]) / running_max[t]` over the series, where
/// `running_max` is the cumulative maximum up to and including `t`.
/// Always ≤ 0; exactly 0 for a monotonically non-decreasing series.
pub fn max_drawdown(navs: &[f64]) -> Result<f64, MetricsError> {
    if navs.is_empty() {
        return Err(MetricsError::insufficient(1, 0));
    }

    let mut running_max = f64::MIN;
    let mut worst = 0.0f64;
    for &nav in navs {
        running_max = running_max.max(nav);
        let drawdown = (nav - running_max) / running_max;
        worst = worst.min(drawdown);
    }
    Ok(worst * 100.0)
}

/// Annualized volatility in percent: sample standard deviation of daily
/// returns × √periods_per_year × 100. Needs at least two daily returns.
pub fn volatility(navs: &[f64], periods_per_year: f64) -> Result<f64, MetricsError> {
    if navs.len() < 3 {
        return Err(MetricsError::insufficient(3, navs.len()));
    }
    let returns = daily_returns(navs);
    ensure_finite(&returns)?;
    Ok(sample_std(&returns) * periods_per_year.sqrt() * 100.0)
}

/// Sharpe ratio: `(annualized_return - risk_free_rate) / annualized_volatility`
/// with `annualized_return = (1 + mean_daily_return)^periods_per_year - 1`.
/// Both terms are fractions here, not percent.
pub fn sharpe_ratio(
    navs: &[f64],
    risk_free_rate: f64,
    periods_per_year: f64,
) -> Result<f64, MetricsError> {
    if navs.len() < 3 {
        return Err(MetricsError::insufficient(3, navs.len()));
    }
    let returns = daily_returns(navs);
    ensure_finite(&returns)?;
    let annual_return = (1.0 + mean(&returns)).powf(periods_per_year) - 1.0;
    let annual_volatility = sample_std(&returns) * periods_per_year.sqrt();
    Ok((annual_return - risk_free_rate) / annual_volatility)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_drawdown_matches_reference_scenario() {
        // Running max [1.0, 1.2, 1.2, 1.2], drawdowns [0, 0, -25%, -8.33%].
        let dd = max_drawdown(&[1.0, 1.2, 0.9, 1.1]).expect("non-empty");
        assert!((dd - (-25.0)).abs() < 1e-9, "dd = {dd}");
    }

    #[test]
    fn max_drawdown_is_zero_for_rising_series() {
        let dd = max_drawdown(&[1.0, 1.1, 1.2, 1.3]).expect("non-empty");
        assert_eq!(dd, 0.0);
    }

    #[test]
    fn max_drawdown_is_never_positive() {
        let dd = max_drawdown(&[2.0, 1.0, 3.0, 0.5]).expect("non-empty");
        assert!(dd <= 0.0);
    }

    #[test]
    fn volatility_scales_with_sqrt_of_periods() {
        let navs = [1.0, 1.01, 1.0, 1.01, 1.0];
        let daily = volatility(&navs, 1.0).expect("enough data");
        let annual = volatility(&navs, 252.0).expect("enough data");
        assert!((annual / daily - 252.0f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn volatility_rejects_series_with_zero_navs() {
        let err = volatility(&[1.0, 0.0, 0.0, 1.0], 252.0).expect_err("must fail");
        assert_eq!(err, MetricsError::NonFiniteReturn { index: 1 });
    }

    #[test]
    fn volatility_rejects_short_windows() {
        let err = volatility(&[1.0, 1.1], 252.0).expect_err("one return is not enough");
        assert_eq!(err, MetricsError::InsufficientData { needed: 3, got: 2 });
    }

    #[test]
    fn sharpe_is_negative_when_growth_trails_risk_free_rate() {
        // Flat series: zero return, below the 3% risk-free rate.
        let navs = [1.0, 1.0001, 1.0, 1.0001, 1.0];
        let sharpe = sharpe_ratio(&navs, 0.03, 252.0).expect("enough data");
        assert!(sharpe < 0.0);
    }
}
