//! Configuration validation.
//!
//! Checks every config value before a backtest runs. Missing optional keys
//! are fine and fall back to defaults; present keys must parse and be in
//! range.

use chrono::NaiveDate;

use crate::domain::error::StratbenchError;
use crate::domain::indicator::macd;
use crate::domain::strategy::{StrategyKind, rsi_reversion, sma_crossover};
use crate::ports::config_port::ConfigPort;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Smallest Bollinger multiplier that survives rounding to hundredths.
const MIN_STD_DEV: f64 = 0.01;

const MACD_DEFAULTS: (usize, usize) = (macd::DEFAULT_FAST, macd::DEFAULT_SLOW);

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), StratbenchError> {
    validate_initial_cash(config)?;
    validate_commission(config)?;
    validate_dates(config)?;
    validate_ticker(config)?;
    Ok(())
}

/// Validate `[strategy] name` and the parameter section of every kind.
pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), StratbenchError> {
    if let Some(name) = config.get_string("strategy", "name") {
        name.parse::<StrategyKind>()?;
    }
    for kind in StrategyKind::all() {
        validate_strategy_section(config, kind)?;
    }
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> StratbenchError {
    StratbenchError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

/// A present key that must parse as a number.
fn number(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<f64>, StratbenchError> {
    match config.get_string(section, key) {
        None => Ok(None),
        Some(raw) => match raw.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(Some(v)),
            _ => Err(invalid(section, key, format!("'{}' is not a number", raw))),
        },
    }
}

/// A present key that must parse as a positive whole number.
fn period(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<usize>, StratbenchError> {
    match config.get_string(section, key) {
        None => Ok(None),
        Some(raw) => match raw.trim().parse::<usize>() {
            Ok(v) if v > 0 => Ok(Some(v)),
            _ => Err(invalid(
                section,
                key,
                format!("'{}' must be a positive integer", raw),
            )),
        },
    }
}

fn validate_initial_cash(config: &dyn ConfigPort) -> Result<(), StratbenchError> {
    if let Some(value) = number(config, "backtest", "initial_cash")? {
        if value <= 0.0 {
            return Err(invalid(
                "backtest",
                "initial_cash",
                "initial_cash must be positive",
            ));
        }
    }
    Ok(())
}

fn validate_commission(config: &dyn ConfigPort) -> Result<(), StratbenchError> {
    if let Some(value) = number(config, "backtest", "commission")? {
        if value < 0.0 {
            return Err(invalid(
                "backtest",
                "commission",
                "commission must be non-negative",
            ));
        }
    }
    Ok(())
}

pub fn parse_date(value: &str, field: &str) -> Result<NaiveDate, StratbenchError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        invalid(
            "backtest",
            field,
            format!("invalid {} format, expected YYYY-MM-DD", field),
        )
    })
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), StratbenchError> {
    let start = config
        .get_string("backtest", "start_date")
        .map(|s| parse_date(&s, "start_date"))
        .transpose()?;
    let end = config
        .get_string("backtest", "end_date")
        .map(|s| parse_date(&s, "end_date"))
        .transpose()?;

    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(invalid(
                "backtest",
                "start_date",
                "start_date must not be after end_date",
            ));
        }
    }
    Ok(())
}

fn validate_ticker(config: &dyn ConfigPort) -> Result<(), StratbenchError> {
    match config.get_string("backtest", "ticker") {
        Some(t) if t.trim().is_empty() => Err(invalid("backtest", "ticker", "ticker is empty")),
        _ => Ok(()),
    }
}

fn validate_fast_slow(
    config: &dyn ConfigPort,
    section: &str,
    fast_key: &str,
    slow_key: &str,
    defaults: (usize, usize),
) -> Result<(), StratbenchError> {
    let fast = period(config, section, fast_key)?.unwrap_or(defaults.0);
    let slow = period(config, section, slow_key)?.unwrap_or(defaults.1);
    if fast >= slow {
        return Err(invalid(
            section,
            fast_key,
            format!("{} ({}) must be less than {} ({})", fast_key, fast, slow_key, slow),
        ));
    }
    Ok(())
}

fn validate_thresholds(config: &dyn ConfigPort, section: &str) -> Result<(), StratbenchError> {
    let oversold =
        number(config, section, "oversold")?.unwrap_or(rsi_reversion::DEFAULT_OVERSOLD);
    let overbought =
        number(config, section, "overbought")?.unwrap_or(rsi_reversion::DEFAULT_OVERBOUGHT);
    if !(0.0..=100.0).contains(&oversold) {
        return Err(invalid(section, "oversold", "oversold must be between 0 and 100"));
    }
    if !(0.0..=100.0).contains(&overbought) {
        return Err(invalid(
            section,
            "overbought",
            "overbought must be between 0 and 100",
        ));
    }
    if oversold >= overbought {
        return Err(invalid(
            section,
            "oversold",
            "oversold must be less than overbought",
        ));
    }
    Ok(())
}

fn validate_std_dev(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<(), StratbenchError> {
    if let Some(value) = number(config, section, key)? {
        if value < MIN_STD_DEV {
            return Err(invalid(
                section,
                key,
                format!("{} must be at least {}", key, MIN_STD_DEV),
            ));
        }
    }
    Ok(())
}

fn validate_strategy_section(
    config: &dyn ConfigPort,
    kind: StrategyKind,
) -> Result<(), StratbenchError> {
    let s = kind.as_str();
    match kind {
        StrategyKind::SmaCrossover => validate_fast_slow(
            config,
            s,
            "fast",
            "slow",
            (sma_crossover::DEFAULT_FAST, sma_crossover::DEFAULT_SLOW),
        ),
        StrategyKind::Rsi => {
            period(config, s, "period")?;
            validate_thresholds(config, s)
        }
        StrategyKind::Macd => {
            period(config, s, "signal")?;
            validate_fast_slow(config, s, "fast", "slow", MACD_DEFAULTS)
        }
        StrategyKind::Bollinger => {
            period(config, s, "period")?;
            validate_std_dev(config, s, "std_dev")
        }
        StrategyKind::Combined => {
            period(config, s, "rsi_period")?;
            period(config, s, "macd_signal")?;
            period(config, s, "bb_period")?;
            validate_thresholds(config, s)?;
            validate_fast_slow(config, s, "macd_fast", "macd_slow", MACD_DEFAULTS)?;
            validate_std_dev(config, s, "bb_std_dev")
        }
    }
}
