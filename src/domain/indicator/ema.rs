//! Exponential Moving Average indicator.
//!
//! k = 2/(n+1), EMA[0] = C[0], then EMA[i] = C[i]*k + EMA[i-1]*(1-k).
//! Defined from the first bar; there is no warmup.

use crate::domain::indicator_helpers::{exponential_smooth, undefined_column};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_ema(bars: &[OhlcvBar], period: usize) -> Vec<f64> {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    ema_of(&closes, period)
}

/// EMA over an arbitrary column, seeded with its first defined value.
pub fn ema_of(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 {
        return undefined_column(values.len());
    }
    exponential_smooth(values, smoothing_factor(period))
}

pub fn smoothing_factor(period: usize) -> f64 {
    2.0 / (period as f64 + 1.0)
}
