use serde_json::Value;

use navlens_core::{FundCode, NavService};

use crate::cli::InfoArgs;
use crate::error::CliError;

pub async fn run(args: &InfoArgs, service: &NavService) -> Result<Value, CliError> {
    let fund_code = FundCode::parse(&args.fund_code)?;

    let metadata = service.get_metadata(&fund_code).await;

    Ok(serde_json::to_value(&metadata)?)
}
