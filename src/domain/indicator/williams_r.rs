//! Williams %R.
//!
//! %R = -100 * (HH(n) - C) / (HH(n) - LL(n)), ranging from -100 to 0.

use crate::domain::indicator_helpers::{undefined_column, window_max, window_min};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_williams_r(bars: &[OhlcvBar], period: usize) -> Vec<f64> {
    let mut values = undefined_column(bars.len());
    if period == 0 {
        return values;
    }

    let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
    let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();

    for i in (period - 1)..bars.len() {
        let hh = window_max(&highs, i, period);
        let ll = window_min(&lows, i, period);
        let range = hh - ll;
        if range > 0.0 {
            values[i] = -100.0 * (hh - bars[i].close) / range;
        }
    }
    values
}
