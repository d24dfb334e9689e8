//! Majority vote of the RSI, MACD and Bollinger rules.

use super::bollinger_bounce::{BollingerBounce, band_vote};
use super::macd_crossover::{MacdCrossover, histogram_vote};
use super::rsi_reversion::{RsiReversion, rsi_vote};
use super::{Strategy, require_columns};
use crate::domain::error::StrategyError;
use crate::domain::indicator::IndicatorType;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::price_series::PriceSeries;
use crate::domain::signal::Signal;

/// BUY iff at least two of the three component votes are BUY, SELL iff at
/// least two are SELL. Any undefined input holds.
#[derive(Debug, Clone, Default)]
pub struct Combined {
    pub rsi: RsiReversion,
    pub macd: MacdCrossover,
    pub bollinger: BollingerBounce,
}

impl Combined {
    pub fn new(rsi: RsiReversion, macd: MacdCrossover, bollinger: BollingerBounce) -> Self {
        Combined {
            rsi,
            macd,
            bollinger,
        }
    }

    fn votes(&self, bar: &OhlcvBar, index: usize, series: &PriceSeries) -> Option<[Signal; 3]> {
        if index == 0 {
            return None;
        }

        let rsi = series.value(self.rsi.column(), index)?;

        let hist = self.macd.histogram_column();
        let prev_hist = series.value(hist, index - 1)?;
        let hist_now = series.value(hist, index)?;

        let (upper_col, lower_col) = self.bollinger.band_columns();
        let upper = series.value(upper_col, index)?;
        let lower = series.value(lower_col, index)?;

        Some([
            rsi_vote(rsi, self.rsi.oversold, self.rsi.overbought),
            histogram_vote(prev_hist, hist_now),
            band_vote(bar.close, upper, lower),
        ])
    }
}

/// Majority of three votes; no majority holds.
pub(crate) fn majority(votes: &[Signal; 3]) -> Signal {
    let buys = votes.iter().filter(|v| **v == Signal::Buy).count();
    let sells = votes.iter().filter(|v| **v == Signal::Sell).count();
    if buys >= 2 {
        Signal::Buy
    } else if sells >= 2 {
        Signal::Sell
    } else {
        Signal::Hold
    }
}

impl Strategy for Combined {
    fn name(&self) -> &str {
        "Combined Vote"
    }

    fn indicators(&self) -> Vec<IndicatorType> {
        vec![
            IndicatorType::Rsi(self.rsi.period),
            self.macd.indicator(),
            self.bollinger.indicator(),
        ]
    }

    fn generate_signal(
        &self,
        bar: &OhlcvBar,
        index: usize,
        series: &PriceSeries,
    ) -> Result<Signal, StrategyError> {
        let (upper_col, lower_col) = self.bollinger.band_columns();
        require_columns(
            self.name(),
            series,
            &[
                self.rsi.column(),
                self.macd.histogram_column(),
                upper_col,
                lower_col,
            ],
        )?;

        Ok(self
            .votes(bar, index, series)
            .map_or(Signal::Hold, |votes| majority(&votes)))
    }
}
