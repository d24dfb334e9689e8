//! Weighted Moving Average indicator.
//!
//! O(n) sliding window implementation.
//! WMA(n) = (1*P[i-n+1] + 2*P[i-n+2] + ... + n*P[i]) / (n*(n+1)/2)
//! Warmup: first (n-1) bars are undefined.

use crate::domain::indicator_helpers::undefined_column;
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_wma(bars: &[OhlcvBar], period: usize) -> Vec<f64> {
    let mut values = undefined_column(bars.len());
    if period == 0 {
        return values;
    }

    let divisor = (period * (period + 1)) as f64 / 2.0;
    let mut weighted_sum: f64 = 0.0;
    let mut window_sum: f64 = 0.0;

    for (i, bar) in bars.iter().enumerate() {
        if i < period {
            weighted_sum += (i + 1) as f64 * bar.close;
            window_sum += bar.close;
        } else {
            weighted_sum += period as f64 * bar.close - window_sum;
            window_sum += bar.close - bars[i - period].close;
        }

        if i + 1 >= period {
            values[i] = weighted_sum / divisor;
        }
    }

    values
}
