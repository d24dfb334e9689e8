//! Build built-in strategies by name from INI configuration.
//!
//! Each kind reads its parameters from a section named after the kind
//! (`[sma_crossover]`, `[rsi]`, `[macd]`, `[bollinger]`, `[combined]`);
//! missing keys fall back to the strategy defaults. Values are range-checked
//! by `config_validation` before a strategy is built.

use std::fmt;
use std::str::FromStr;

use super::{BollingerBounce, Combined, MacdCrossover, RsiReversion, SmaCrossover, Strategy};
use crate::domain::error::StratbenchError;
use crate::domain::indicator::{bollinger, macd};
use crate::ports::config_port::ConfigPort;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    SmaCrossover,
    Rsi,
    Macd,
    Bollinger,
    Combined,
}

impl StrategyKind {
    pub fn all() -> [StrategyKind; 5] {
        [
            StrategyKind::SmaCrossover,
            StrategyKind::Rsi,
            StrategyKind::Macd,
            StrategyKind::Bollinger,
            StrategyKind::Combined,
        ]
    }

    /// Canonical name; also the INI section holding the kind's parameters.
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::SmaCrossover => "sma_crossover",
            StrategyKind::Rsi => "rsi",
            StrategyKind::Macd => "macd",
            StrategyKind::Bollinger => "bollinger",
            StrategyKind::Combined => "combined",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            StrategyKind::SmaCrossover => "fast SMA crossing the slow SMA",
            StrategyKind::Rsi => "RSI below oversold buys, above overbought sells",
            StrategyKind::Macd => "MACD histogram crossing zero",
            StrategyKind::Bollinger => "close touching the Bollinger bands",
            StrategyKind::Combined => "majority vote of the RSI, MACD and Bollinger rules",
        }
    }

    /// Parameter keys read from the kind's section.
    pub fn parameter_keys(&self) -> &'static [&'static str] {
        match self {
            StrategyKind::SmaCrossover => &["fast", "slow"],
            StrategyKind::Rsi => &["period", "oversold", "overbought"],
            StrategyKind::Macd => &["fast", "slow", "signal"],
            StrategyKind::Bollinger => &["period", "std_dev"],
            StrategyKind::Combined => &[
                "rsi_period",
                "oversold",
                "overbought",
                "macd_fast",
                "macd_slow",
                "macd_signal",
                "bb_period",
                "bb_std_dev",
            ],
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = StratbenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sma_crossover" | "sma" => Ok(StrategyKind::SmaCrossover),
            "rsi" | "rsi_reversion" => Ok(StrategyKind::Rsi),
            "macd" | "macd_crossover" => Ok(StrategyKind::Macd),
            "bollinger" | "bollinger_bounce" => Ok(StrategyKind::Bollinger),
            "combined" => Ok(StrategyKind::Combined),
            _ => Err(StratbenchError::UnknownStrategy {
                name: s.to_string(),
            }),
        }
    }
}

fn period(config: &dyn ConfigPort, section: &str, key: &str, default: usize) -> usize {
    usize::try_from(config.get_int(section, key, default as i64)).unwrap_or(default)
}

fn sma_crossover(config: &dyn ConfigPort) -> SmaCrossover {
    let defaults = SmaCrossover::default();
    let s = StrategyKind::SmaCrossover.as_str();
    SmaCrossover::new(
        period(config, s, "fast", defaults.fast),
        period(config, s, "slow", defaults.slow),
    )
}

fn rsi_reversion(config: &dyn ConfigPort, s: &str, period_key: &str) -> RsiReversion {
    let defaults = RsiReversion::default();
    RsiReversion::new(
        period(config, s, period_key, defaults.period),
        config.get_double(s, "oversold", defaults.oversold),
        config.get_double(s, "overbought", defaults.overbought),
    )
}

fn macd_crossover(config: &dyn ConfigPort, s: &str, prefix: &str) -> MacdCrossover {
    MacdCrossover::new(
        period(config, s, &format!("{prefix}fast"), macd::DEFAULT_FAST),
        period(config, s, &format!("{prefix}slow"), macd::DEFAULT_SLOW),
        period(config, s, &format!("{prefix}signal"), macd::DEFAULT_SIGNAL),
    )
}

fn bollinger_bounce(config: &dyn ConfigPort, s: &str, prefix: &str) -> BollingerBounce {
    BollingerBounce::new(
        period(config, s, &format!("{prefix}period"), bollinger::DEFAULT_PERIOD),
        config.get_double(s, &format!("{prefix}std_dev"), bollinger::DEFAULT_STDDEV_MULT),
    )
}

/// Build the strategy `kind` with parameters from its config section.
pub fn build_strategy(kind: StrategyKind, config: &dyn ConfigPort) -> Box<dyn Strategy> {
    let s = kind.as_str();
    match kind {
        StrategyKind::SmaCrossover => Box::new(sma_crossover(config)),
        StrategyKind::Rsi => Box::new(rsi_reversion(config, s, "period")),
        StrategyKind::Macd => Box::new(macd_crossover(config, s, "")),
        StrategyKind::Bollinger => Box::new(bollinger_bounce(config, s, "")),
        StrategyKind::Combined => Box::new(Combined::new(
            rsi_reversion(config, s, "rsi_period"),
            macd_crossover(config, s, "macd_"),
            bollinger_bounce(config, s, "bb_"),
        )),
    }
}

/// One of every built-in strategy with default parameters.
pub fn default_strategies() -> Vec<Box<dyn Strategy>> {
    vec![
        Box::new(SmaCrossover::default()),
        Box::new(RsiReversion::default()),
        Box::new(MacdCrossover::default()),
        Box::new(BollingerBounce::default()),
        Box::new(Combined::default()),
    ]
}
