//! MACD histogram crossover.
//!
//! BUY when the histogram moves from <= 0 to > 0, SELL when it moves from
//! >= 0 to < 0.

use super::{Strategy, require_columns};
use crate::domain::error::StrategyError;
use crate::domain::indicator::IndicatorType;
use crate::domain::indicator::macd::{DEFAULT_FAST, DEFAULT_SIGNAL, DEFAULT_SLOW};
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::price_series::PriceSeries;
use crate::domain::signal::Signal;

#[derive(Debug, Clone)]
pub struct MacdCrossover {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
    name: String,
    histogram_column: String,
}

impl MacdCrossover {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        let indicator = IndicatorType::Macd { fast, slow, signal };
        MacdCrossover {
            fast,
            slow,
            signal,
            name: format!("MACD Crossover({},{},{})", fast, slow, signal),
            histogram_column: indicator.column_names()[2].clone(),
        }
    }

    pub(crate) fn indicator(&self) -> IndicatorType {
        IndicatorType::Macd {
            fast: self.fast,
            slow: self.slow,
            signal: self.signal,
        }
    }

    pub(crate) fn histogram_column(&self) -> &str {
        &self.histogram_column
    }
}

impl Default for MacdCrossover {
    fn default() -> Self {
        MacdCrossover::new(DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
    }
}

/// Zero-line cross of the histogram between two consecutive bars.
pub(crate) fn histogram_vote(prev: f64, current: f64) -> Signal {
    if prev <= 0.0 && current > 0.0 {
        Signal::Buy
    } else if prev >= 0.0 && current < 0.0 {
        Signal::Sell
    } else {
        Signal::Hold
    }
}

impl Strategy for MacdCrossover {
    fn name(&self) -> &str {
        &self.name
    }

    fn indicators(&self) -> Vec<IndicatorType> {
        vec![self.indicator()]
    }

    fn generate_signal(
        &self,
        _bar: &OhlcvBar,
        index: usize,
        series: &PriceSeries,
    ) -> Result<Signal, StrategyError> {
        require_columns(&self.name, series, &[self.histogram_column.as_str()])?;
        if index == 0 {
            return Ok(Signal::Hold);
        }

        let prev = series.value(&self.histogram_column, index - 1);
        let current = series.value(&self.histogram_column, index);
        Ok(match (prev, current) {
            (Some(prev), Some(current)) => histogram_vote(prev, current),
            _ => Signal::Hold,
        })
    }
}
