//! Bollinger band bounce.
//!
//! BUY when the close touches or falls through the lower band, SELL when it
//! touches or rises through the upper band.

use super::{Strategy, require_columns};
use crate::domain::error::StrategyError;
use crate::domain::indicator::bollinger::{DEFAULT_PERIOD, DEFAULT_STDDEV_MULT};
use crate::domain::indicator::{IndicatorType, mult_to_x100};
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::price_series::PriceSeries;
use crate::domain::signal::Signal;

#[derive(Debug, Clone)]
pub struct BollingerBounce {
    pub period: usize,
    pub std_dev: f64,
    name: String,
    upper_column: String,
    lower_column: String,
}

impl BollingerBounce {
    /// `std_dev` is kept to hundredths, the precision the band columns carry.
    pub fn new(period: usize, std_dev: f64) -> Self {
        let stddev_mult_x100 = mult_to_x100(std_dev);
        let std_dev = stddev_mult_x100 as f64 / 100.0;
        let indicator = IndicatorType::Bollinger {
            period,
            stddev_mult_x100,
        };
        let columns = indicator.column_names();
        BollingerBounce {
            period,
            std_dev,
            name: format!("Bollinger Bounce({},{})", period, std_dev),
            upper_column: columns[0].clone(),
            lower_column: columns[2].clone(),
        }
    }

    pub(crate) fn indicator(&self) -> IndicatorType {
        IndicatorType::Bollinger {
            period: self.period,
            stddev_mult_x100: mult_to_x100(self.std_dev),
        }
    }

    pub(crate) fn band_columns(&self) -> (&str, &str) {
        (&self.upper_column, &self.lower_column)
    }
}

impl Default for BollingerBounce {
    fn default() -> Self {
        BollingerBounce::new(DEFAULT_PERIOD, DEFAULT_STDDEV_MULT)
    }
}

pub(crate) fn band_vote(close: f64, upper: f64, lower: f64) -> Signal {
    if close <= lower {
        Signal::Buy
    } else if close >= upper {
        Signal::Sell
    } else {
        Signal::Hold
    }
}

impl Strategy for BollingerBounce {
    fn name(&self) -> &str {
        &self.name
    }

    fn indicators(&self) -> Vec<IndicatorType> {
        vec![self.indicator()]
    }

    fn generate_signal(
        &self,
        bar: &OhlcvBar,
        index: usize,
        series: &PriceSeries,
    ) -> Result<Signal, StrategyError> {
        require_columns(
            &self.name,
            series,
            &[self.upper_column.as_str(), self.lower_column.as_str()],
        )?;

        let upper = series.value(&self.upper_column, index);
        let lower = series.value(&self.lower_column, index);
        Ok(match (upper, lower) {
            (Some(upper), Some(lower)) => band_vote(bar.close, upper, lower),
            _ => Signal::Hold,
        })
    }
}
