use serde::Serialize;
use serde_json::Value;

use navlens_core::{FundCode, NavRecord, NavService};

use crate::cli::SeriesArgs;
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct SeriesResponseData<'a> {
    fund_code: &'a str,
    rows: usize,
    date_range: Option<DateRangeData>,
    records: &'a [NavRecord],
}

#[derive(Debug, Serialize)]
struct DateRangeData {
    start: String,
    end: String,
}

pub async fn run(args: &SeriesArgs, service: &NavService) -> Result<Value, CliError> {
    let fund_code = FundCode::parse(&args.fund_code)?;
    let window = super::parse_window(args.start.as_deref(), args.end.as_deref())?;

    let mut series = service.get_series(&fund_code, args.fill_missing).await;
    if let Some((start, end)) = window {
        series = series.window(start, end);
    }

    let date_range = series.date_range().map(|(start, end)| DateRangeData {
        start: start.format_iso(),
        end: end.format_iso(),
    });
    let data = SeriesResponseData {
        fund_code: fund_code.as_str(),
        rows: series.len(),
        date_range,
        records: series.records(),
    };

    Ok(serde_json::to_value(&data)?)
}
