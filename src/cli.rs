//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report::JsonReport;
use crate::adapters::text_report::TextReport;
use crate::domain::backtest::{
    BacktestConfig, Backtester, DEFAULT_COMMISSION, DEFAULT_INITIAL_CASH, run_parallel,
};
use crate::domain::config_validation::{
    parse_date, validate_backtest_config, validate_strategy_config,
};
use crate::domain::error::StratbenchError;
use crate::domain::metrics::BacktestResult;
use crate::domain::price_series::PriceSeries;
use crate::domain::strategy::{Strategy, StrategyKind, build_strategy};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

const DEFAULT_DATA_DIR: &str = "data";

#[derive(Parser, Debug)]
#[command(name = "stratbench", about = "Trading strategy backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by `backtest` and `compare`. Flags override the config file.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// INI configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Directory holding <TICKER>.csv files
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
    #[arg(short, long)]
    pub ticker: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    pub cash: Option<f64>,
    /// Flat commission per fill
    #[arg(long, allow_negative_numbers = true)]
    pub commission: Option<f64>,
    /// First bar date (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<NaiveDate>,
    /// Last bar date (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<NaiveDate>,
    /// Also write the result(s) as JSON to this path
    #[arg(long)]
    pub json: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one strategy over one ticker
    Backtest {
        #[command(flatten)]
        args: RunArgs,
        /// Strategy kind (see `strategies`)
        #[arg(short, long)]
        strategy: Option<String>,
        /// Print the trade log
        #[arg(long)]
        trades: bool,
    },
    /// Run every built-in strategy over one ticker in parallel
    Compare {
        #[command(flatten)]
        args: RunArgs,
    },
    /// List the built-in strategies and their parameters
    Strategies,
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Install the stderr tracing subscriber; `RUST_LOG` overrides the `info` default.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A subscriber may already be installed when embedded in tests.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn run(cli: Cli) -> ExitCode {
    init_tracing();

    let outcome = match cli.command {
        Command::Backtest {
            args,
            strategy,
            trades,
        } => run_backtest(&args, strategy.as_deref(), trades),
        Command::Compare { args } => run_compare(&args),
        Command::Strategies => {
            print_strategies();
            Ok(())
        }
        Command::Validate { config } => run_validate(&config),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Load the config file, or an empty config when none is given.
pub fn load_config(path: Option<&Path>) -> Result<FileConfigAdapter, StratbenchError> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "Loading config");
            FileConfigAdapter::from_file(path)
        }
        None => FileConfigAdapter::from_string(""),
    }
}

/// Everything a run needs once flags and config are merged.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub data_dir: PathBuf,
    pub ticker: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub backtest: BacktestConfig,
}

fn optional_date(
    flag: Option<NaiveDate>,
    config: &dyn ConfigPort,
    key: &str,
) -> Result<Option<NaiveDate>, StratbenchError> {
    match flag {
        Some(date) => Ok(Some(date)),
        None => config
            .get_string("backtest", key)
            .map(|s| parse_date(&s, key))
            .transpose(),
    }
}

pub fn resolve_settings(
    args: &RunArgs,
    config: &dyn ConfigPort,
) -> Result<RunSettings, StratbenchError> {
    let ticker = args
        .ticker
        .clone()
        .or_else(|| config.get_string("backtest", "ticker"))
        .map(|t| t.trim().to_uppercase())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| StratbenchError::ConfigMissing {
            section: "backtest".into(),
            key: "ticker".into(),
        })?;

    let data_dir = args
        .data_dir
        .clone()
        .or_else(|| config.get_string("backtest", "data_dir").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

    let start_date = optional_date(args.start, config, "start_date")?;
    let end_date = optional_date(args.end, config, "end_date")?;
    if let (Some(start), Some(end)) = (start_date, end_date) {
        if start > end {
            return Err(StratbenchError::invalid_input(format!(
                "start date {} is after end date {}",
                start, end
            )));
        }
    }

    let backtest = BacktestConfig {
        initial_cash: args.cash.unwrap_or_else(|| {
            config.get_double("backtest", "initial_cash", DEFAULT_INITIAL_CASH)
        }),
        commission: args
            .commission
            .unwrap_or_else(|| config.get_double("backtest", "commission", DEFAULT_COMMISSION)),
    };
    backtest.validate()?;

    Ok(RunSettings {
        data_dir,
        ticker,
        start_date,
        end_date,
        backtest,
    })
}

/// Strategy kind from the flag, then `[strategy] name`, then SMA crossover.
pub fn resolve_strategy_kind(
    flag: Option<&str>,
    config: &dyn ConfigPort,
) -> Result<StrategyKind, StratbenchError> {
    match flag.map(str::to_string).or_else(|| config.get_string("strategy", "name")) {
        Some(name) => name.parse(),
        None => Ok(StrategyKind::SmaCrossover),
    }
}

fn load_validated(path: Option<&Path>) -> Result<FileConfigAdapter, StratbenchError> {
    let config = load_config(path)?;
    validate_backtest_config(&config)?;
    validate_strategy_config(&config)?;
    Ok(config)
}

fn fetch(settings: &RunSettings) -> Result<PriceSeries, StratbenchError> {
    let data = CsvAdapter::new(&settings.data_dir);
    match data.fetch_series(&settings.ticker, settings.start_date, settings.end_date) {
        Err(StratbenchError::NoData { ticker }) => {
            let available = data.list_tickers().unwrap_or_default();
            if !available.is_empty() {
                info!(
                    data_dir = %settings.data_dir.display(),
                    available = %available.join(", "),
                    "Requested ticker not found"
                );
            }
            Err(StratbenchError::NoData { ticker })
        }
        other => other,
    }
}

fn write_file(path: &Path, content: &str) -> Result<(), StratbenchError> {
    fs::write(path, content).map_err(|e| StratbenchError::Report {
        reason: format!("failed to write {}: {}", path.display(), e),
    })?;
    info!(path = %path.display(), "Report written");
    Ok(())
}

fn run_backtest(
    args: &RunArgs,
    strategy_flag: Option<&str>,
    trades_flag: bool,
) -> Result<(), StratbenchError> {
    let config = load_validated(args.config.as_deref())?;
    let settings = resolve_settings(args, &config)?;
    let kind = resolve_strategy_kind(strategy_flag, &config)?;
    let strategy = build_strategy(kind, &config);

    let series = fetch(&settings)?;
    let result = Backtester::new(settings.backtest.clone()).run(strategy.as_ref(), series)?;

    let include_trades = trades_flag || config.get_bool("report", "include_trades", false);
    print!("{}", TextReport::new(include_trades).render(&result)?);

    if let Some(path) = &args.json {
        write_file(path, &JsonReport::default().render(&result)?)?;
    }
    Ok(())
}

fn run_compare(args: &RunArgs) -> Result<(), StratbenchError> {
    let config = load_validated(args.config.as_deref())?;
    let settings = resolve_settings(args, &config)?;
    let strategies: Vec<Box<dyn Strategy>> = StrategyKind::all()
        .iter()
        .map(|kind| build_strategy(*kind, &config))
        .collect();

    let series = fetch(&settings)?;
    let backtester = Backtester::new(settings.backtest.clone());
    let results = run_parallel(&backtester, &strategies, &series)
        .into_iter()
        .collect::<Result<Vec<BacktestResult>, _>>()?;

    print!("{}", TextReport::default().render_comparison(&results)?);

    if let Some(path) = &args.json {
        write_file(path, &JsonReport::default().render_comparison(&results)?)?;
    }
    Ok(())
}

fn print_strategies() {
    for kind in StrategyKind::all() {
        println!("{:<14} {}", kind, kind.description());
        println!("{:<14} [{}] {}", "", kind, kind.parameter_keys().join(", "));
    }
}

fn run_validate(path: &Path) -> Result<(), StratbenchError> {
    let config = load_validated(Some(path))?;
    let kind = resolve_strategy_kind(None, &config)?;
    let strategy = build_strategy(kind, &config);
    eprintln!("Strategy: {}", strategy.name());
    eprintln!("Configuration is valid.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    #[test]
    fn cli_parses_backtest_flags() {
        let cli = Cli::try_parse_from([
            "stratbench",
            "backtest",
            "--ticker",
            "aapl",
            "--strategy",
            "rsi",
            "--cash",
            "5000",
            "--start",
            "2024-01-01",
            "--trades",
        ])
        .unwrap();
        match cli.command {
            Command::Backtest {
                args,
                strategy,
                trades,
            } => {
                assert_eq!(args.ticker.as_deref(), Some("aapl"));
                assert_eq!(strategy.as_deref(), Some("rsi"));
                assert_eq!(args.cash, Some(5000.0));
                assert_eq!(args.start, NaiveDate::from_ymd_opt(2024, 1, 1));
                assert!(trades);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn cli_passes_negative_amounts_through() {
        let cli = Cli::try_parse_from([
            "stratbench",
            "compare",
            "--cash",
            "-100",
            "--commission",
            "-3",
        ])
        .unwrap();
        match cli.command {
            Command::Compare { args } => {
                assert_eq!(args.cash, Some(-100.0));
                assert_eq!(args.commission, Some(-3.0));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn cli_rejects_bad_date() {
        assert!(Cli::try_parse_from(["stratbench", "compare", "--start", "yesterday"]).is_err());
    }

    #[test]
    fn settings_flags_override_config() {
        let c = config("[backtest]\nticker = msft\ninitial_cash = 2000\ndata_dir = /prices\n");
        let args = RunArgs {
            ticker: Some("aapl".into()),
            commission: Some(1.0),
            ..RunArgs::default()
        };
        let settings = resolve_settings(&args, &c).unwrap();
        assert_eq!(settings.ticker, "AAPL");
        assert_eq!(settings.backtest.initial_cash, 2000.0);
        assert_eq!(settings.backtest.commission, 1.0);
        assert_eq!(settings.data_dir, PathBuf::from("/prices"));
    }

    #[test]
    fn settings_defaults() {
        let c = config("[backtest]\nticker = spy\n");
        let settings = resolve_settings(&RunArgs::default(), &c).unwrap();
        assert_eq!(settings.backtest, BacktestConfig::default());
        assert_eq!(settings.data_dir, PathBuf::from("data"));
        assert_eq!(settings.start_date, None);
    }

    #[test]
    fn settings_require_ticker() {
        let err = resolve_settings(&RunArgs::default(), &config("")).unwrap_err();
        assert!(matches!(err, StratbenchError::ConfigMissing { key, .. } if key == "ticker"));
    }

    #[test]
    fn settings_reject_bad_flag_values() {
        let args = RunArgs {
            ticker: Some("X".into()),
            cash: Some(-1.0),
            ..RunArgs::default()
        };
        let err = resolve_settings(&args, &config("")).unwrap_err();
        assert!(matches!(err, StratbenchError::InvalidInput { .. }));
    }

    #[test]
    fn strategy_kind_resolution_order() {
        let c = config("[strategy]\nname = bollinger\n");
        assert_eq!(
            resolve_strategy_kind(Some("macd"), &c).unwrap(),
            StrategyKind::Macd
        );
        assert_eq!(
            resolve_strategy_kind(None, &c).unwrap(),
            StrategyKind::Bollinger
        );
        assert_eq!(
            resolve_strategy_kind(None, &config("")).unwrap(),
            StrategyKind::SmaCrossover
        );
        assert!(resolve_strategy_kind(Some("nope"), &c).is_err());
    }
}
