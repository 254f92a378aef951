use serde::Serialize;
use serde_json::Value;
use time::Date;

use navlens_core::{CalendarDate, FundCode, FundMetadata, NavSeries, NavService};
use navlens_metrics::{
    annualized_return, max_drawdown, money_window_metrics, period_returns, return_distribution,
    rolling_seven_day_annualized, rolling_yield_max, rolling_yield_min, seven_day_annualized,
    sharpe_ratio, standard_window_metrics, volatility, MoneyWindowMetrics, Period, PeriodReturn,
    ReturnDistribution, StandardWindowMetrics, TRADING_DAYS_PER_YEAR,
};

use crate::cli::ReportArgs;
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct ReportResponseData {
    metadata: FundMetadata,
    rows: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    standard: Option<StandardReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    money: Option<MoneyReport>,
}

/// Metrics for unit-price funds.
#[derive(Debug, Serialize)]
struct StandardReport {
    annualized_return: f64,
    volatility: f64,
    sharpe_ratio: f64,
    max_drawdown: f64,
    distribution: ReturnDistribution,
    monthly_returns: Vec<PeriodReturn>,
    quarterly_returns: Vec<PeriodReturn>,
    yearly_returns: Vec<PeriodReturn>,
    #[serde(skip_serializing_if = "Option::is_none")]
    window: Option<StandardWindowMetrics>,
}

/// Metrics for money-market funds, whose series carries per-10,000-share
/// daily yields instead of unit prices.
#[derive(Debug, Serialize)]
struct MoneyReport {
    seven_day_annualized: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    rolling_max: Option<YieldPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rolling_min: Option<YieldPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    window: Option<MoneyWindowMetrics>,
}

#[derive(Debug, Serialize)]
struct YieldPoint {
    date: String,
    value: f64,
}

pub async fn run(args: &ReportArgs, service: &NavService) -> Result<Value, CliError> {
    let fund_code = FundCode::parse(&args.fund_code)?;
    let window = super::parse_window(args.start.as_deref(), args.end.as_deref())?;

    let metadata = service.get_metadata(&fund_code).await;
    let series = service.get_series(&fund_code, false).await;
    if series.is_empty() {
        return Err(CliError::Command(format!(
            "no NAV data available for fund {fund_code}"
        )));
    }

    let windowed = match window {
        Some((start, end)) => {
            let sub = series.window(start, end);
            if sub.is_empty() {
                return Err(CliError::Command(format!(
                    "no rows between {start} and {end}"
                )));
            }
            Some((sub, start, end))
        }
        None => None,
    };

    let rows = series.len();
    let data = if metadata.is_money_fund {
        ReportResponseData {
            metadata,
            rows,
            standard: None,
            money: Some(money_report(&series, windowed.as_ref())?),
        }
    } else {
        ReportResponseData {
            metadata,
            rows,
            standard: Some(standard_report(
                &series,
                windowed.as_ref(),
                args.risk_free_rate,
            )?),
            money: None,
        }
    };

    Ok(serde_json::to_value(&data)?)
}

fn raw_dates(series: &NavSeries) -> Vec<Date> {
    series
        .dates()
        .into_iter()
        .map(CalendarDate::into_inner)
        .collect()
}

fn standard_report(
    series: &NavSeries,
    windowed: Option<&(NavSeries, CalendarDate, CalendarDate)>,
    risk_free_rate: f64,
) -> Result<StandardReport, CliError> {
    let dates = raw_dates(series);
    let navs = series.navs();

    let window = windowed
        .map(|(sub, start, end)| {
            standard_window_metrics(start.into_inner(), end.into_inner(), &sub.navs())
        })
        .transpose()?;

    Ok(StandardReport {
        annualized_return: annualized_return(&navs, TRADING_DAYS_PER_YEAR)?,
        volatility: volatility(&navs, TRADING_DAYS_PER_YEAR)?,
        sharpe_ratio: sharpe_ratio(&navs, risk_free_rate, TRADING_DAYS_PER_YEAR)?,
        max_drawdown: max_drawdown(&navs)?,
        distribution: return_distribution(&navs)?,
        monthly_returns: period_returns(&dates, &navs, Period::Month)?,
        quarterly_returns: period_returns(&dates, &navs, Period::Quarter)?,
        yearly_returns: period_returns(&dates, &navs, Period::Year)?,
        window,
    })
}

fn money_report(
    series: &NavSeries,
    windowed: Option<&(NavSeries, CalendarDate, CalendarDate)>,
) -> Result<MoneyReport, CliError> {
    let dates = series.dates();
    let yields = series.navs();

    let rolling = rolling_seven_day_annualized(&yields)?;
    let to_point = |extreme: navlens_metrics::YieldExtreme| YieldPoint {
        date: dates[extreme.index].format_iso(),
        value: extreme.value,
    };

    let window = windowed
        .map(|(sub, start, end)| {
            money_window_metrics(start.into_inner(), end.into_inner(), &sub.navs())
        })
        .transpose()?;

    Ok(MoneyReport {
        seven_day_annualized: seven_day_annualized(&yields)?,
        rolling_max: rolling_yield_max(&rolling).map(to_point),
        rolling_min: rolling_yield_min(&rolling).map(to_point),
        window,
    })
}
