//! End-to-end numeric checks for the metrics crate, driven through series
//! shapes a report would actually produce.

use navlens_metrics::{
    annualized_return, max_drawdown, money_window_metrics, period_returns, return_distribution,
    rolling_seven_day_annualized, rolling_yield_max, rolling_yield_min, seven_day_annualized,
    sharpe_ratio, standard_window_metrics, volatility, MetricsError, Period,
    CALENDAR_DAYS_PER_YEAR, TRADING_DAYS_PER_YEAR,
};
use navlens_tests::date;

const EPS: f64 = 1e-9;

#[test]
fn a_ten_percent_gain_over_one_trading_year_annualizes_to_ten_percent() {
    // 252 observations, geometric ramp from 1.0 to 1.1.
    let step = 1.1_f64.powf(1.0 / 251.0);
    let navs: Vec<f64> = (0..252).map(|i| step.powi(i as i32)).collect();

    let result = annualized_return(&navs, TRADING_DAYS_PER_YEAR).expect("enough data");

    assert!((result - 10.0).abs() < 1e-6, "got {result}");
}

#[test]
fn drawdown_volatility_and_sharpe_agree_on_a_known_series() {
    let navs = [1.0, 1.2, 0.9, 1.1];

    let dd = max_drawdown(&navs).expect("non-empty");
    assert!((dd - (-25.0)).abs() < EPS, "got {dd}");

    // Daily returns [0.2, -0.25, 0.2222...]; sample std with ddof 1.
    let returns = [0.2, -0.25, 2.0 / 9.0];
    let mean = returns.iter().sum::<f64>() / 3.0;
    let std =
        (returns.iter().map(|r| (r - mean) * (r - mean)).sum::<f64>() / 2.0).sqrt();
    let expected_vol = std * TRADING_DAYS_PER_YEAR.sqrt() * 100.0;
    let vol = volatility(&navs, TRADING_DAYS_PER_YEAR).expect("enough data");
    assert!((vol - expected_vol).abs() < EPS, "got {vol}");

    let expected_sharpe = ((1.0 + mean).powf(TRADING_DAYS_PER_YEAR) - 1.0 - 0.03)
        / (std * TRADING_DAYS_PER_YEAR.sqrt());
    let sharpe = sharpe_ratio(&navs, 0.03, TRADING_DAYS_PER_YEAR).expect("enough data");
    // The 252-power compounding amplifies rounding, so compare relatively.
    let tolerance = expected_sharpe.abs() * 1e-9;
    assert!((sharpe - expected_sharpe).abs() < tolerance, "got {sharpe}");
}

#[test]
fn period_returns_compound_within_calendar_buckets() {
    let dates = [
        date("2024-01-30").into_inner(),
        date("2024-01-31").into_inner(),
        date("2024-02-01").into_inner(),
        date("2024-02-02").into_inner(),
    ];
    let navs = [1.0, 1.1, 1.21, 1.331];

    let monthly = period_returns(&dates, &navs, Period::Month).expect("enough data");

    // January gets the 1.0 -> 1.1 move; February compounds the two 10% days.
    assert_eq!(monthly.len(), 2);
    assert_eq!(monthly[0].label, "2024-01");
    assert!((monthly[0].value - 10.0).abs() < EPS);
    assert_eq!(monthly[1].label, "2024-02");
    assert!((monthly[1].value - 21.0).abs() < 1e-6);

    let yearly = period_returns(&dates, &navs, Period::Year).expect("enough data");
    assert_eq!(yearly.len(), 1);
    assert_eq!(yearly[0].label, "2024");
    assert!((yearly[0].value - 33.1).abs() < 1e-6);
}

#[test]
fn distribution_moments_match_hand_computation_for_a_symmetric_series() {
    // Alternating +1%/-1% daily moves give a symmetric return set (eight
    // returns, four of each sign).
    let mut navs = vec![1.0];
    for i in 0..8 {
        let last = *navs.last().expect("non-empty");
        let r = if i % 2 == 0 { 0.01 } else { -0.01 };
        navs.push(last * (1.0 + r));
    }

    let dist = return_distribution(&navs).expect("enough data");

    assert!(dist.mean.abs() < 1e-12);
    assert!((dist.max - 1.0).abs() < EPS);
    assert!((dist.min - (-1.0)).abs() < EPS);
    // Perfectly alternating signs leave the distribution unskewed.
    assert!(dist.skew.abs() < 1e-9);
}

#[test]
fn seven_day_money_yield_annualizes_the_trailing_week() {
    // 1.2 yuan per 10,000 shares over the trailing 7 days.
    let yields = [9.0, 9.0, 0.1, 0.2, 0.1, 0.2, 0.1, 0.2, 0.3];
    let trailing: f64 = yields[2..].iter().sum();
    let expected =
        ((1.0 + trailing / 10_000.0).powf(CALENDAR_DAYS_PER_YEAR / 7.0) - 1.0) * 100.0;

    let result = seven_day_annualized(&yields).expect("enough data");

    assert!((result - expected).abs() < EPS, "got {result}");
}

#[test]
fn rolling_seven_day_extremes_report_the_right_positions() {
    let yields = [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 9.0, 0.1];

    let rolling = rolling_seven_day_annualized(&yields).expect("enough data");

    assert_eq!(rolling.len(), 9);
    assert!(rolling[..6].iter().all(Option::is_none));

    // The window ending at the 9.0 spike is the max; the flat opening
    // window is the min (0.1 replaces a 1.0, but 9.0 dominates both later
    // windows).
    let max = rolling_yield_max(&rolling).expect("has values");
    let min = rolling_yield_min(&rolling).expect("has values");
    assert_eq!(max.index, 7);
    assert_eq!(min.index, 6);
    assert!(max.value > min.value);
}

#[test]
fn window_metrics_use_trading_days_and_calendar_days_correctly() {
    let navs: Vec<f64> = (0..10).map(|i| 1.0 + i as f64 * 0.01).collect();

    let metrics = standard_window_metrics(
        date("2024-01-01").into_inner(),
        date("2024-01-10").into_inner(),
        &navs,
    )
    .expect("enough data");

    assert_eq!(metrics.trading_days, 10);
    assert_eq!(metrics.calendar_days, 10);
    assert!((metrics.start_nav - 1.0).abs() < EPS);
    assert!((metrics.end_nav - 1.09).abs() < EPS);
    assert!((metrics.cumulative_return - 9.0).abs() < EPS);
    let expected_annualized = (1.09_f64.powf(252.0 / 10.0) - 1.0) * 100.0;
    assert!((metrics.annualized_return - expected_annualized).abs() < 1e-6);
    // Monotonically rising series never draws down.
    assert!(metrics.max_drawdown.abs() < EPS);
}

#[test]
fn money_window_metrics_annualize_by_calendar_span() {
    let yields = [1.0, 1.1, 0.9, 1.0, 1.2, 0.8, 1.0];

    let metrics = money_window_metrics(
        date("2024-01-01").into_inner(),
        date("2024-01-07").into_inner(),
        &yields,
    )
    .expect("enough data");

    let cumulative = yields.iter().sum::<f64>() / 10_000.0 * 100.0;
    let expected = ((1.0 + cumulative / 100.0).powf(365.0 / 7.0) - 1.0) * 100.0;
    assert_eq!(metrics.trading_days, 7);
    assert_eq!(metrics.calendar_days, 7);
    assert!((metrics.cumulative_return - cumulative).abs() < EPS);
    assert!((metrics.annualized_return - expected).abs() < 1e-6);
}

#[test]
fn window_bounds_on_non_trading_days_still_count_in_the_calendar_span() {
    // Requested Sat 2024-01-06 through Sun 2024-01-14; rows exist only for
    // the Mon-Fri week in between. The span is 9 days, not 5.
    let yields = [0.5, 0.5, 0.5, 0.5, 0.5];

    let metrics = money_window_metrics(
        date("2024-01-06").into_inner(),
        date("2024-01-14").into_inner(),
        &yields,
    )
    .expect("enough data");

    assert_eq!(metrics.trading_days, 5);
    assert_eq!(metrics.calendar_days, 9);
    let expected = ((1.0_f64 + 2.5 / 10_000.0).powf(365.0 / 9.0) - 1.0) * 100.0;
    assert!((metrics.annualized_return - expected).abs() < EPS);
}

#[test]
fn zero_nav_rows_surface_an_error_instead_of_nan() {
    // A fund with unknown metadata routes yield-like values through the
    // standard metrics; two consecutive zero rows divide 0.0 by 0.0.
    let navs = [1.0, 0.0, 0.0, 1.0, 1.1, 1.2];

    let err = return_distribution(&navs).expect_err("must fail");
    assert_eq!(err, MetricsError::NonFiniteReturn { index: 1 });

    let err = volatility(&navs, TRADING_DAYS_PER_YEAR).expect_err("must fail");
    assert_eq!(err, MetricsError::NonFiniteReturn { index: 1 });

    let err = sharpe_ratio(&navs, 0.03, TRADING_DAYS_PER_YEAR).expect_err("must fail");
    assert_eq!(err, MetricsError::NonFiniteReturn { index: 1 });
}

#[test]
fn short_windows_surface_insufficient_data_instead_of_nan() {
    let navs = [1.0, 1.01];

    let err = volatility(&navs, TRADING_DAYS_PER_YEAR).expect_err("too short");
    assert!(matches!(err, MetricsError::InsufficientData { .. }));

    let err = return_distribution(&navs).expect_err("too short");
    assert!(matches!(err, MetricsError::InsufficientData { .. }));
}
