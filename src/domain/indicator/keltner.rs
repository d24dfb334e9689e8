//! Keltner Channels.
//!
//! Middle = EMA(ema_period) of Close; bands = Middle ± mult × ATR(atr_period).
//! The middle line is defined from the first bar, the bands once ATR is.

use crate::domain::indicator::BandSeries;
use crate::domain::indicator::atr::calculate_atr;
use crate::domain::indicator::ema::calculate_ema;
use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_EMA_PERIOD: usize = 20;
pub const DEFAULT_ATR_PERIOD: usize = 14;
pub const DEFAULT_MULT: f64 = 2.0;

pub fn calculate_keltner(
    bars: &[OhlcvBar],
    ema_period: usize,
    atr_period: usize,
    mult: f64,
) -> BandSeries {
    let middle = calculate_ema(bars, ema_period);
    let atr = calculate_atr(bars, atr_period);

    let upper = middle.iter().zip(&atr).map(|(m, a)| m + mult * a).collect();
    let lower = middle.iter().zip(&atr).map(|(m, a)| m - mult * a).collect();

    BandSeries {
        upper,
        middle,
        lower,
    }
}
