//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};

use crate::adapters::console_report::ConsoleReporter;
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::svg_report::SvgChartAdapter;
use crate::domain::backtest::{BacktestConfig, BacktestResult, DEFAULT_BUDGET};
use crate::domain::engine;
use crate::domain::error::CrossError;
use crate::domain::indicator::{
    DEFAULT_FAST_WINDOW, DEFAULT_SLOW_WINDOW, Windows, compute_indicators,
};
use crate::domain::series;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::{ReportContext, ReportPort};

const DEFAULT_DATA_DIR: &str = "data";

#[derive(Parser, Debug)]
#[command(name = "crosstrader", about = "Moving-average crossover backtester")]
pub struct Cli {
    /// Log debug detail to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a golden cross backtest
    Backtest(BacktestArgs),
    /// Show the data range available for a symbol
    Info {
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        data_dir: Option<PathBuf>,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// Flags for `backtest`; each one overrides its config file counterpart.
#[derive(Args, Debug, Clone, Default)]
pub struct BacktestArgs {
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub symbol: Option<String>,
    /// First date, YYYY-MM-DD
    #[arg(long)]
    pub start: Option<NaiveDate>,
    /// End date (exclusive), YYYY-MM-DD
    #[arg(long)]
    pub end: Option<NaiveDate>,
    #[arg(long)]
    pub budget: Option<Decimal>,
    #[arg(long)]
    pub fast: Option<usize>,
    #[arg(long)]
    pub slow: Option<usize>,
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
    #[arg(long)]
    pub chart: Option<PathBuf>,
    #[arg(long)]
    pub no_chart: bool,
}

pub fn run(cli: Cli) -> ExitCode {
    init_tracing(cli.verbose);

    let outcome = match cli.command {
        Command::Backtest(args) => run_backtest(&args).map(|_| ()),
        Command::Info {
            symbol,
            data_dir,
            config,
        } => run_info(&symbol, data_dir.as_deref(), config.as_deref())
            .map(|summary| println!("{summary}")),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            (&e).into()
        }
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .try_init();
}

/// Load an INI file, or an empty configuration when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<FileConfigAdapter, CrossError> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "loading config");
            FileConfigAdapter::from_file(path).map_err(|e| CrossError::ConfigParse {
                file: path.display().to_string(),
                reason: e.to_string(),
            })
        }
        None => Ok(FileConfigAdapter::empty()),
    }
}

fn config_date(
    config: &dyn ConfigPort,
    key: &str,
    cli_value: Option<NaiveDate>,
) -> Result<NaiveDate, CrossError> {
    if let Some(date) = cli_value {
        return Ok(date);
    }
    let raw = config
        .get_string("backtest", key)
        .ok_or_else(|| CrossError::ConfigMissing {
            section: "backtest".into(),
            key: key.into(),
        })?;
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| {
        CrossError::invalid("backtest", key, "invalid date format (expected YYYY-MM-DD)")
    })
}

fn config_window(
    config: &dyn ConfigPort,
    key: &str,
    cli_value: Option<usize>,
    default: usize,
) -> Result<usize, CrossError> {
    let window = match cli_value {
        Some(w) => w,
        None => match config.get_string("strategy", key) {
            Some(_) => config
                .get_int("strategy", key)
                .and_then(|w| usize::try_from(w).ok())
                .ok_or_else(|| CrossError::invalid("strategy", key, "not a positive integer"))?,
            None => default,
        },
    };
    if window == 0 {
        return Err(CrossError::invalid("strategy", key, "window must be at least 1"));
    }
    Ok(window)
}

pub fn build_backtest_config(
    config: &dyn ConfigPort,
    args: &BacktestArgs,
) -> Result<BacktestConfig, CrossError> {
    let symbol = args
        .symbol
        .clone()
        .or_else(|| config.get_string("backtest", "symbol"))
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| CrossError::ConfigMissing {
            section: "backtest".into(),
            key: "symbol".into(),
        })?;

    let start_date = config_date(config, "start_date", args.start)?;
    let end_date = config_date(config, "end_date", args.end)?;
    if start_date >= end_date {
        return Err(CrossError::invalid(
            "backtest",
            "end_date",
            format!("must be after start_date {}", start_date),
        ));
    }

    let budget = match args.budget {
        Some(b) => b,
        None => match config.get_string("backtest", "budget") {
            Some(_) => config.get_decimal("backtest", "budget").ok_or_else(|| {
                CrossError::invalid("backtest", "budget", "not a decimal number")
            })?,
            None => DEFAULT_BUDGET,
        },
    };
    if budget <= Decimal::ZERO {
        return Err(CrossError::invalid("backtest", "budget", "must be positive"));
    }

    let windows = Windows {
        fast: config_window(config, "fast_window", args.fast, DEFAULT_FAST_WINDOW)?,
        slow: config_window(config, "slow_window", args.slow, DEFAULT_SLOW_WINDOW)?,
    };
    if windows.fast >= windows.slow {
        return Err(CrossError::invalid(
            "strategy",
            "fast_window",
            format!("must be below slow_window ({})", windows.slow),
        ));
    }

    Ok(BacktestConfig {
        symbol,
        start_date,
        end_date,
        budget,
        windows,
    })
}

pub fn resolve_data_dir(config: &dyn ConfigPort, cli_value: Option<&Path>) -> PathBuf {
    cli_value
        .map(Path::to_path_buf)
        .or_else(|| config.get_string("data", "dir").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

/// Where to write the chart, or `None` when charting is switched off.
pub fn resolve_chart_path(
    config: &dyn ConfigPort,
    args: &BacktestArgs,
    symbol: &str,
) -> Option<PathBuf> {
    if args.no_chart || !config.get_bool("report", "chart", true) {
        return None;
    }
    Some(
        args.chart
            .clone()
            .or_else(|| config.get_string("report", "chart_path").map(PathBuf::from))
            .unwrap_or_else(|| SvgChartAdapter::default_path(symbol)),
    )
}

/// Fetch, clean, compute averages, trade, then hand the run to each reporter.
///
/// Reporters only run once the whole scan has finished.
pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    config: &BacktestConfig,
    reporters: &[&dyn ReportPort],
) -> Result<BacktestResult, CrossError> {
    info!(
        symbol = %config.symbol,
        start = %config.start_date,
        end = %config.end_date,
        "downloading price history"
    );
    let raw = data_port.fetch_closes(&config.symbol, config.start_date, config.end_date)?;
    info!(rows = raw.len(), "fetched price history");

    let series = series::clean(&config.symbol, raw)?;
    let indicators = compute_indicators(&series, config.windows);

    info!(
        bars = series.len(),
        windows = %config.windows,
        budget = %config.budget,
        "running backtest"
    );
    let result = engine::run_backtest(&series, &indicators, config.budget);

    let ctx = ReportContext {
        series: &series,
        indicators: &indicators,
        result: &result,
    };
    for reporter in reporters {
        reporter.write(&ctx)?;
    }

    Ok(result)
}

pub fn run_backtest(args: &BacktestArgs) -> Result<BacktestResult, CrossError> {
    let adapter = load_config(args.config.as_deref())?;
    let bt_config = build_backtest_config(&adapter, args)?;
    let data_port = CsvAdapter::new(resolve_data_dir(&adapter, args.data_dir.as_deref()));

    let chart = resolve_chart_path(&adapter, args, &bt_config.symbol).map(SvgChartAdapter::new);
    let console = ConsoleReporter::new();

    // The chart goes first so a write failure aborts before anything is printed.
    let mut reporters: Vec<&dyn ReportPort> = Vec::with_capacity(2);
    if let Some(chart) = chart.as_ref() {
        reporters.push(chart);
    }
    reporters.push(&console);

    run_backtest_pipeline(&data_port, &bt_config, &reporters)
}

/// One-line summary of the bars on file for `symbol`.
pub fn run_info(
    symbol: &str,
    data_dir: Option<&Path>,
    config_path: Option<&Path>,
) -> Result<String, CrossError> {
    let adapter = load_config(config_path)?;
    let data_port = CsvAdapter::new(resolve_data_dir(&adapter, data_dir));
    let symbol = symbol.trim().to_uppercase();

    match data_port.get_data_range(&symbol)? {
        Some((first, last, count)) => {
            Ok(format!("{}: {} bars, {} to {}", symbol, count, first, last))
        }
        None => Err(CrossError::NoData { symbol }),
    }
}
