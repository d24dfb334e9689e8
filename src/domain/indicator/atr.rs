//! Average True Range.
//!
//! TR[0] = H - L, TR[i] = max(H-L, |H-C[i-1]|, |L-C[i-1]|).
//! ATR is the Wilder-smoothed TR: seeded with the mean of the first n TR values
//! at index n-1, then ATR[i] = (ATR[i-1] * (n-1) + TR[i]) / n.

use crate::domain::indicator_helpers::wilder_smooth;
use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_PERIOD: usize = 14;

pub fn calculate_atr(bars: &[OhlcvBar], period: usize) -> Vec<f64> {
    wilder_smooth(&true_ranges(bars), period, 0)
}

pub fn true_ranges(bars: &[OhlcvBar]) -> Vec<f64> {
    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            if i == 0 {
                bar.high - bar.low
            } else {
                bar.true_range(bars[i - 1].close)
            }
        })
        .collect()
}
