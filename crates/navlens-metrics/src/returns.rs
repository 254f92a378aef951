//! Daily, annualized, and period-resampled returns.

use std::fmt::{Display, Formatter};

use serde::Serialize;
use time::Date;

use crate::error::MetricsError;

/// Day-over-day fractional returns. The first observation has no prior day,
/// so the result holds `navs.len() - 1` entries (empty below 2 observations).
pub fn daily_returns(navs: &[f64]) -> Vec<f64> {
    navs.windows(2).map(|w| w[1] / w[0] - 1.0).collect()
}

/// A zero NAV row turns the division in [`daily_returns`] into NaN or an
/// infinity; metrics reject such a series instead of propagating the value.
pub(crate) fn ensure_finite(returns: &[f64]) -> Result<(), MetricsError> {
    match returns.iter().position(|r| !r.is_finite()) {
        Some(index) => Err(MetricsError::NonFiniteReturn { index }),
        None => Ok(()),
    }
}

/// Annualized return in percent.
///
/// `total_return = nav[last]/nav[first] - 1`, compounded over the holding
/// period: `(1 + total_return)^(periods_per_year / holding_days) - 1`, ×100.
/// Holding days is the observation count of the series.
pub fn annualized_return(navs: &[f64], periods_per_year: f64) -> Result<f64, MetricsError> {
    if navs.len() < 2 {
        return Err(MetricsError::insufficient(2, navs.len()));
    }
    let total_return = navs[navs.len() - 1] / navs[0] - 1.0;
    let holding_days = navs.len() as f64;
    Ok(((1.0 + total_return).powf(periods_per_year / holding_days) - 1.0) * 100.0)
}

/// Resampling granularity for [`period_returns`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Month,
    Quarter,
    Year,
}

/// One compounded return bucket, labeled `2024-03`, `2024Q1`, or `2024`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodReturn {
    pub label: String,
    /// Compounded return for the bucket, in percent.
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BucketKey {
    year: i32,
    sub: u8,
}

impl BucketKey {
    fn for_date(date: Date, period: Period) -> Self {
        let month = date.month() as u8;
        match period {
            Period::Month => Self {
                year: date.year(),
                sub: month,
            },
            Period::Quarter => Self {
                year: date.year(),
                sub: (month - 1) / 3 + 1,
            },
            Period::Year => Self {
                year: date.year(),
                sub: 0,
            },
        }
    }

    fn label(self, period: Period) -> String {
        match period {
            Period::Month => format!("{:04}-{:02}", self.year, self.sub),
            Period::Quarter => format!("{:04}Q{}", self.year, self.sub),
            Period::Year => format!("{:04}", self.year),
        }
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Month => "month",
            Self::Quarter => "quarter",
            Self::Year => "year",
        })
    }
}

/// Compounded period returns: the product of `(1 + daily_return)` over each
/// calendar bucket, minus 1, in percent. Each daily return is bucketed by its
/// own date (the later of the two days it spans). Dates must be ascending.
pub fn period_returns(
    dates: &[Date],
    navs: &[f64],
    period: Period,
) -> Result<Vec<PeriodReturn>, MetricsError> {
    if dates.len() != navs.len() {
        return Err(MetricsError::LengthMismatch {
            dates: dates.len(),
            values: navs.len(),
        });
    }
    if navs.len() < 2 {
        return Err(MetricsError::insufficient(2, navs.len()));
    }

    let mut buckets: Vec<PeriodReturn> = Vec::new();
    let mut current: Option<(BucketKey, f64)> = None;

    for i in 1..navs.len() {
        let r = navs[i] / navs[i - 1] - 1.0;
        let key = BucketKey::for_date(dates[i], period);
        match current {
            Some((open_key, product)) if open_key == key => {
                current = Some((open_key, product * (1.0 + r)));
            }
            Some((open_key, product)) => {
                buckets.push(PeriodReturn {
                    label: open_key.label(period),
                    value: (product - 1.0) * 100.0,
                });
                current = Some((key, 1.0 + r));
            }
            None => current = Some((key, 1.0 + r)),
        }
    }

    if let Some((open_key, product)) = current {
        buckets.push(PeriodReturn {
            label: open_key.label(period),
            value: (product - 1.0) * 100.0,
        });
    }

    Ok(buckets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn daily_returns_drop_the_first_observation() {
        let returns = daily_returns(&[1.0, 1.1, 1.045]);
        assert_eq!(returns.len(), 2);
        assert!((returns[0] - 0.1).abs() < 1e-12);
        assert!((returns[1] - (-0.05)).abs() < 1e-12);
    }

    #[test]
    fn annualized_return_matches_one_year_scenario() {
        // 252 observations from 1.0 to 1.1: exactly one trading year held,
        // so the annualized return equals the total return.
        let navs: Vec<f64> = (0..252)
            .map(|i| 1.0 + 0.1 * i as f64 / 251.0)
            .collect();
        let annual = annualized_return(&navs, 252.0).expect("enough data");
        assert!((annual - 10.0).abs() < 1e-9, "annual = {annual}");
    }

    #[test]
    fn annualized_return_needs_two_points() {
        let err = annualized_return(&[1.0], 252.0).expect_err("must fail");
        assert_eq!(err, MetricsError::InsufficientData { needed: 2, got: 1 });
    }

    #[test]
    fn period_returns_compound_within_month_buckets() {
        let dates = [
            date!(2024 - 01 - 30),
            date!(2024 - 01 - 31),
            date!(2024 - 02 - 01),
            date!(2024 - 02 - 02),
        ];
        let navs = [1.0, 1.01, 1.0302, 1.02];
        let monthly = period_returns(&dates, &navs, Period::Month).expect("enough data");

        assert_eq!(monthly.len(), 2);
        assert_eq!(monthly[0].label, "2024-01");
        assert!((monthly[0].value - 1.0).abs() < 1e-9);
        assert_eq!(monthly[1].label, "2024-02");
        // (1.0302/1.01) * (1.02/1.0302) - 1 = 1.02/1.01 - 1
        assert!((monthly[1].value - (1.02 / 1.01 - 1.0) * 100.0).abs() < 1e-9);
    }

    #[test]
    fn quarter_and_year_labels() {
        let dates = [
            date!(2023 - 12 - 29),
            date!(2024 - 01 - 02),
            date!(2024 - 04 - 01),
        ];
        let navs = [1.0, 1.1, 1.21];
        let quarterly = period_returns(&dates, &navs, Period::Quarter).expect("enough data");
        assert_eq!(quarterly[0].label, "2024Q1");
        assert_eq!(quarterly[1].label, "2024Q2");

        let yearly = period_returns(&dates, &navs, Period::Year).expect("enough data");
        assert_eq!(yearly.len(), 1);
        assert_eq!(yearly[0].label, "2024");
        assert!((yearly[0].value - 21.0).abs() < 1e-9);
    }
}
