//! RSI (Relative Strength Index) indicator implementation.
//!
//! Uses Wilder's smoothing (alpha = 1/n) for average gain/loss:
//! - First average: simple mean of gains/losses over the first n changes
//! - Subsequent: avg = (prev_avg * (n-1) + current) / n
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100
//!
//! Warmup: first n bars are undefined (n price changes are needed).

use crate::domain::indicator_helpers::{undefined_column, wilder_smooth};
use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_PERIOD: usize = 14;

pub fn calculate_rsi(bars: &[OhlcvBar], period: usize) -> Vec<f64> {
    if bars.len() < 2 {
        return undefined_column(bars.len());
    }

    let mut gains = undefined_column(bars.len());
    let mut losses = undefined_column(bars.len());
    for i in 1..bars.len() {
        let change = bars[i].close - bars[i - 1].close;
        gains[i] = change.max(0.0);
        losses[i] = (-change).max(0.0);
    }

    let avg_gain = wilder_smooth(&gains, period, 1);
    let avg_loss = wilder_smooth(&losses, period, 1);

    avg_gain
        .iter()
        .zip(&avg_loss)
        .map(|(&g, &l)| ratio_index(g, l))
        .collect()
}

/// 100 - 100 / (1 + up / down), saturating at 100 when `down` is zero.
pub(crate) fn ratio_index(up: f64, down: f64) -> f64 {
    if up.is_nan() || down.is_nan() {
        f64::NAN
    } else if down == 0.0 {
        100.0
    } else {
        100.0 - (100.0 / (1.0 + up / down))
    }
}
