//! CLI argument definitions for navlens.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `series` | Fetch a fund's NAV history, cache-first |
//! | `info` | Resolve fund metadata from the search endpoint |
//! | `report` | Full analytics report for a fund |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--cache-dir` | `data/fund_cache` | On-disk NAV cache location |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--delay-ms` | `500` | Delay between upstream page requests |
//!
//! # Examples
//!
//! ```bash
//! # Full NAV history, served from cache when written today
//! navlens series 161725
//!
//! # Forward-fill non-trading days
//! navlens series 161725 --fill-missing
//!
//! # Analytics over a sub-period
//! navlens report 161725 --start 2024-01-01 --end 2024-06-30 --pretty
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Fund NAV history and analytics CLI backed by Eastmoney public endpoints.
#[derive(Debug, Parser)]
#[command(
    name = "navlens",
    author,
    version,
    about = "Fund NAV history and analytics CLI"
)]
pub struct Cli {
    /// Directory holding the on-disk NAV cache.
    #[arg(long, global = true, default_value = "data/fund_cache")]
    pub cache_dir: PathBuf,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Delay between consecutive upstream page requests, in milliseconds.
    #[arg(long, global = true, default_value_t = 500)]
    pub delay_ms: u64,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch a fund's NAV history.
    ///
    /// Serves from the local cache when it was written today; otherwise
    /// fetches only the dates missing since the last cached row.
    ///
    /// # Examples
    ///
    ///   navlens series 161725
    ///   navlens series 161725 --fill-missing --pretty
    ///   navlens series 161725 --start 2024-01-01 --end 2024-06-30
    Series(SeriesArgs),

    /// Resolve fund name, company, and type.
    ///
    /// Lookup failures degrade to "unknown" fields rather than erroring.
    ///
    /// # Examples
    ///
    ///   navlens info 161725
    Info(InfoArgs),

    /// Full analytics report for a fund.
    ///
    /// Standard funds get return, risk, and distribution metrics;
    /// money-market funds get 7-day annualized yield analytics. With
    /// `--start`/`--end` the report also covers that sub-period.
    ///
    /// # Examples
    ///
    ///   navlens report 161725
    ///   navlens report 000198 --start 2024-01-01 --end 2024-06-30
    Report(ReportArgs),
}

/// Arguments for the `series` command.
#[derive(Debug, Args)]
pub struct SeriesArgs {
    /// Six-digit fund code (e.g. 161725).
    pub fund_code: String,

    /// Forward-fill non-trading days so every calendar day has a row.
    #[arg(long, default_value_t = false)]
    pub fill_missing: bool,

    /// Only print rows from this date on (YYYY-MM-DD). Requires --end.
    #[arg(long)]
    pub start: Option<String>,

    /// Only print rows up to this date (YYYY-MM-DD). Requires --start.
    #[arg(long)]
    pub end: Option<String>,
}

/// Arguments for the `info` command.
#[derive(Debug, Args)]
pub struct InfoArgs {
    /// Six-digit fund code.
    pub fund_code: String,
}

/// Arguments for the `report` command.
#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Six-digit fund code.
    pub fund_code: String,

    /// Window start date (YYYY-MM-DD). Requires --end.
    #[arg(long)]
    pub start: Option<String>,

    /// Window end date (YYYY-MM-DD). Requires --start.
    #[arg(long)]
    pub end: Option<String>,

    /// Annual risk-free rate used by the Sharpe ratio.
    #[arg(long, default_value_t = navlens_metrics::DEFAULT_RISK_FREE_RATE)]
    pub risk_free_rate: f64,
}
