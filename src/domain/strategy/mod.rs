//! Strategy interface and built-in strategies.
//!
//! A strategy attaches the indicator columns it needs once, in [`Strategy::init`],
//! and then emits one [`Signal`] per bar from [`Strategy::generate_signal`]
//! without recomputing indicators. Signals may only depend on bars `0..=index`.
//! Any undefined indicator value a strategy consults yields `Signal::Hold`.

pub mod bollinger_bounce;
pub mod combined;
pub mod factory;
pub mod macd_crossover;
pub mod rsi_reversion;
pub mod sma_crossover;

pub use bollinger_bounce::BollingerBounce;
pub use combined::Combined;
pub use factory::{StrategyKind, build_strategy, default_strategies};
pub use macd_crossover::MacdCrossover;
pub use rsi_reversion::RsiReversion;
pub use sma_crossover::SmaCrossover;

use crate::domain::error::StrategyError;
use crate::domain::indicator::IndicatorType;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::price_series::PriceSeries;
use crate::domain::signal::Signal;

pub trait Strategy: Send + Sync {
    fn name(&self) -> &str;

    /// Indicators attached by the default `init`.
    fn indicators(&self) -> Vec<IndicatorType> {
        Vec::new()
    }

    /// Called once before the first bar; returns the series with every
    /// column `generate_signal` reads.
    fn init(&self, series: PriceSeries) -> Result<PriceSeries, StrategyError> {
        Ok(self
            .indicators()
            .iter()
            .fold(series, |series, indicator| series.with_indicator(indicator)))
    }

    /// Decide for bar `index`. Must not read rows after `index`.
    fn generate_signal(
        &self,
        bar: &OhlcvBar,
        index: usize,
        series: &PriceSeries,
    ) -> Result<Signal, StrategyError>;
}

/// Fail with a `StrategyError` unless every named column is attached.
pub(crate) fn require_columns(
    strategy: &str,
    series: &PriceSeries,
    names: &[&str],
) -> Result<(), StrategyError> {
    match names.iter().find(|name| !series.has_column(name)) {
        Some(missing) => Err(StrategyError::new(
            strategy,
            format!("column {} is not attached; was init called?", missing),
        )),
        None => Ok(()),
    }
}

/// `a` was at or below `b` on the previous bar and is above it now.
pub(crate) fn crossed_above(prev_a: f64, prev_b: f64, a: f64, b: f64) -> bool {
    prev_a <= prev_b && a > b
}

/// `a` was at or above `b` on the previous bar and is below it now.
pub(crate) fn crossed_below(prev_a: f64, prev_b: f64, a: f64, b: f64) -> bool {
    prev_a >= prev_b && a < b
}
