//! Standard Deviation indicator.
//!
//! Population standard deviation over n closing prices.
//! STDDEV(n)[i] = sqrt(sum((C[i-j] - SMA(n)[i])^2 for j in 0..n-1) / n)
//! Warmup: first (n-1) bars are undefined.

use crate::domain::indicator_helpers::undefined_column;
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_stddev(bars: &[OhlcvBar], period: usize) -> Vec<f64> {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    rolling_population_stddev(&closes, period)
}

pub fn rolling_population_stddev(values: &[f64], period: usize) -> Vec<f64> {
    let mut out = undefined_column(values.len());
    if period == 0 {
        return out;
    }

    for i in (period - 1)..values.len() {
        let window = &values[i + 1 - period..=i];
        let mean = window.iter().sum::<f64>() / period as f64;
        let variance = window
            .iter()
            .map(|v| {
                let diff = v - mean;
                diff * diff
            })
            .sum::<f64>()
            / period as f64;
        out[i] = variance.sqrt();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_bars(prices: &[f64]) -> Vec<OhlcvBar> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| OhlcvBar {
                date: NaiveDate::from_ymd_opt(2024, 1, (i + 1) as u32).unwrap(),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000.0,
            })
            .collect()
    }

    #[test]
    fn stddev_warmup() {
        let sd = calculate_stddev(&make_bars(&[1.0, 2.0, 3.0]), 3);
        assert!(sd[0].is_nan());
        assert!(sd[1].is_nan());
        assert!(!sd[2].is_nan());
    }

    #[test]
    fn stddev_known_value() {
        // Population std of 2,4,4,4,5,5,7,9 is exactly 2.
        let sd = calculate_stddev(&make_bars(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]), 8);
        assert!((sd[7] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn stddev_constant_prices_is_zero() {
        let sd = calculate_stddev(&make_bars(&[5.0; 4]), 2);
        assert!(sd[1..].iter().all(|v| v.abs() < f64::EPSILON));
    }
}
