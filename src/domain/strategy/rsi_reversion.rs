//! RSI mean reversion.
//!
//! BUY while RSI is below `oversold`, SELL while it is above `overbought`.
//! The signal repeats every bar the condition holds; it does not look at the
//! portfolio, so an all-in buy simply blocks later buys for lack of cash.

use super::{Strategy, require_columns};
use crate::domain::error::StrategyError;
use crate::domain::indicator::IndicatorType;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::price_series::PriceSeries;
use crate::domain::signal::Signal;

pub const DEFAULT_PERIOD: usize = 14;
pub const DEFAULT_OVERSOLD: f64 = 30.0;
pub const DEFAULT_OVERBOUGHT: f64 = 70.0;

#[derive(Debug, Clone)]
pub struct RsiReversion {
    pub period: usize,
    pub oversold: f64,
    pub overbought: f64,
    name: String,
    column: String,
}

impl RsiReversion {
    pub fn new(period: usize, oversold: f64, overbought: f64) -> Self {
        RsiReversion {
            period,
            oversold,
            overbought,
            name: format!("RSI Reversion({},{},{})", period, oversold, overbought),
            column: IndicatorType::Rsi(period).to_string(),
        }
    }

    pub(crate) fn column(&self) -> &str {
        &self.column
    }
}

impl Default for RsiReversion {
    fn default() -> Self {
        RsiReversion::new(DEFAULT_PERIOD, DEFAULT_OVERSOLD, DEFAULT_OVERBOUGHT)
    }
}

/// Threshold vote on a single RSI reading.
pub(crate) fn rsi_vote(rsi: f64, oversold: f64, overbought: f64) -> Signal {
    if rsi < oversold {
        Signal::Buy
    } else if rsi > overbought {
        Signal::Sell
    } else {
        Signal::Hold
    }
}

impl Strategy for RsiReversion {
    fn name(&self) -> &str {
        &self.name
    }

    fn indicators(&self) -> Vec<IndicatorType> {
        vec![IndicatorType::Rsi(self.period)]
    }

    fn generate_signal(
        &self,
        _bar: &OhlcvBar,
        index: usize,
        series: &PriceSeries,
    ) -> Result<Signal, StrategyError> {
        require_columns(&self.name, series, &[self.column.as_str()])?;
        Ok(series
            .value(&self.column, index)
            .map_or(Signal::Hold, |rsi| {
                rsi_vote(rsi, self.oversold, self.overbought)
            }))
    }
}
