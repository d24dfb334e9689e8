//! Moving-average crossover.
//!
//! BUY when the fast SMA crosses above the slow SMA, SELL when it crosses below.

use super::{Strategy, crossed_above, crossed_below, require_columns};
use crate::domain::error::StrategyError;
use crate::domain::indicator::IndicatorType;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::price_series::PriceSeries;
use crate::domain::signal::Signal;

pub const DEFAULT_FAST: usize = 20;
pub const DEFAULT_SLOW: usize = 50;

#[derive(Debug, Clone)]
pub struct SmaCrossover {
    pub fast: usize,
    pub slow: usize,
    name: String,
    fast_column: String,
    slow_column: String,
}

impl SmaCrossover {
    pub fn new(fast: usize, slow: usize) -> Self {
        SmaCrossover {
            fast,
            slow,
            name: format!("SMA Crossover({},{})", fast, slow),
            fast_column: IndicatorType::Sma(fast).to_string(),
            slow_column: IndicatorType::Sma(slow).to_string(),
        }
    }
}

impl Default for SmaCrossover {
    fn default() -> Self {
        SmaCrossover::new(DEFAULT_FAST, DEFAULT_SLOW)
    }
}

impl Strategy for SmaCrossover {
    fn name(&self) -> &str {
        &self.name
    }

    fn indicators(&self) -> Vec<IndicatorType> {
        vec![IndicatorType::Sma(self.fast), IndicatorType::Sma(self.slow)]
    }

    fn generate_signal(
        &self,
        _bar: &OhlcvBar,
        index: usize,
        series: &PriceSeries,
    ) -> Result<Signal, StrategyError> {
        require_columns(
            &self.name,
            series,
            &[self.fast_column.as_str(), self.slow_column.as_str()],
        )?;
        if index == 0 {
            return Ok(Signal::Hold);
        }

        let values = (
            series.value(&self.fast_column, index - 1),
            series.value(&self.slow_column, index - 1),
            series.value(&self.fast_column, index),
            series.value(&self.slow_column, index),
        );
        let (Some(prev_fast), Some(prev_slow), Some(fast), Some(slow)) = values else {
            return Ok(Signal::Hold);
        };

        if crossed_above(prev_fast, prev_slow, fast, slow) {
            Ok(Signal::Buy)
        } else if crossed_below(prev_fast, prev_slow, fast, slow) {
            Ok(Signal::Sell)
        } else {
            Ok(Signal::Hold)
        }
    }
}
