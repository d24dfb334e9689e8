//! Bollinger Bands indicator.
//!
//! Bollinger Bands consist of:
//! - Middle: Simple Moving Average (SMA) over n periods
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! Where StdDev is population standard deviation (divides by N, not N-1).
//!
//! Default parameters: period=20, multiplier=2.0
//! Warmup: first (period-1) bars are undefined.

use crate::domain::indicator::BandSeries;
use crate::domain::indicator::stddev::rolling_population_stddev;
use crate::domain::indicator_helpers::rolling_mean;
use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_PERIOD: usize = 20;
pub const DEFAULT_STDDEV_MULT: f64 = 2.0;

pub fn calculate_bollinger(bars: &[OhlcvBar], period: usize, mult: f64) -> BandSeries {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let middle = rolling_mean(&closes, period);
    let stddev = rolling_population_stddev(&closes, period);

    let upper = middle
        .iter()
        .zip(&stddev)
        .map(|(m, sd)| m + mult * sd)
        .collect();
    let lower = middle
        .iter()
        .zip(&stddev)
        .map(|(m, sd)| m - mult * sd)
        .collect();

    BandSeries {
        upper,
        middle,
        lower,
    }
}
