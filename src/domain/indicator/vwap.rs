//! Volume Weighted Average Price.
//!
//! Running VWAP[i] = Σ(TP·V) / Σ(V) over bars 0..=i, TP = (H+L+C)/3.
//! Undefined while cumulative volume is zero.

use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_vwap(bars: &[OhlcvBar]) -> Vec<f64> {
    let mut cum_pv = 0.0;
    let mut cum_volume = 0.0;

    bars.iter()
        .map(|bar| {
            cum_pv += bar.typical_price() * bar.volume;
            cum_volume += bar.volume;
            if cum_volume > 0.0 {
                cum_pv / cum_volume
            } else {
                f64::NAN
            }
        })
        .collect()
}
