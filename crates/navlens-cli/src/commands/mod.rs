mod info;
mod report;
mod series;

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use navlens_core::{CacheStore, CalendarDate, EastmoneyAdapter, FetchPacer, NavService, ReqwestHttpClient};

use crate::cli::{Cli, Command};
use crate::error::CliError;

/// Parse an optional `--start`/`--end` pair. Both or neither must be given.
fn parse_window(
    start: Option<&str>,
    end: Option<&str>,
) -> Result<Option<(CalendarDate, CalendarDate)>, CliError> {
    match (start, end) {
        (None, None) => Ok(None),
        (Some(start), Some(end)) => {
            let start = CalendarDate::parse(start)?;
            let end = CalendarDate::parse(end)?;
            if start > end {
                return Err(CliError::Command(format!(
                    "--start {start} is after --end {end}"
                )));
            }
            Ok(Some((start, end)))
        }
        _ => Err(CliError::Command(String::from(
            "--start and --end must be provided together",
        ))),
    }
}

pub async fn run(cli: &Cli) -> Result<Value, CliError> {
    let service = build_service(cli);

    match &cli.command {
        Command::Series(args) => series::run(args, &service).await,
        Command::Info(args) => info::run(args, &service).await,
        Command::Report(args) => report::run(args, &service).await,
    }
}

fn build_service(cli: &Cli) -> NavService {
    tracing::debug!(cache_dir = %cli.cache_dir.display(), delay_ms = cli.delay_ms, "building service");

    let adapter = EastmoneyAdapter::with_http_client(Arc::new(ReqwestHttpClient::new()))
        .with_pacer(FetchPacer::new(Duration::from_millis(cli.delay_ms)));
    let store = CacheStore::new(cli.cache_dir.clone());

    NavService::new(Arc::new(adapter), store)
}
