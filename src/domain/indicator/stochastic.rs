//! Stochastic oscillator.
//!
//! %K = 100 * (C - LL(k)) / (HH(k) - LL(k)), %D = SMA(%K, d).
//! A zero high-low range leaves %K undefined for that bar.

use crate::domain::indicator::StochasticSeries;
use crate::domain::indicator_helpers::{rolling_mean, undefined_column, window_max, window_min};
use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_K_PERIOD: usize = 14;
pub const DEFAULT_D_PERIOD: usize = 3;

pub fn calculate_stochastic(
    bars: &[OhlcvBar],
    k_period: usize,
    d_period: usize,
) -> StochasticSeries {
    let mut k = undefined_column(bars.len());

    if k_period > 0 {
        let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
        let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();

        for i in (k_period - 1)..bars.len() {
            let hh = window_max(&highs, i, k_period);
            let ll = window_min(&lows, i, k_period);
            let range = hh - ll;
            if range > 0.0 {
                k[i] = 100.0 * (bars[i].close - ll) / range;
            }
        }
    }

    let d = rolling_mean(&k, d_period);
    StochasticSeries { k, d }
}
