//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal) of MACD Line
//! Histogram = MACD Line - Signal Line
//!
//! Default parameters: fast=12, slow=26, signal=9. Since every EMA is seeded
//! with its first input, all three lines are defined from the first bar.

use crate::domain::indicator::MacdSeries;
use crate::domain::indicator::ema::{calculate_ema, ema_of};
use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

pub fn calculate_macd(
    bars: &[OhlcvBar],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> MacdSeries {
    let ema_fast = calculate_ema(bars, fast);
    let ema_slow = calculate_ema(bars, slow);

    let line: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| f - s)
        .collect();
    let signal = ema_of(&line, signal_period);
    let histogram = line.iter().zip(&signal).map(|(l, s)| l - s).collect();

    MacdSeries {
        line,
        signal,
        histogram,
    }
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
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                    + chrono::Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000.0,
            })
            .collect()
    }

    #[test]
    fn macd_starts_at_zero() {
        let macd = calculate_macd(&make_bars(&[50.0, 51.0, 52.0]), 12, 26, 9);
        assert!(macd.line[0].abs() < f64::EPSILON);
        assert!(macd.signal[0].abs() < f64::EPSILON);
        assert!(macd.histogram[0].abs() < f64::EPSILON);
    }

    #[test]
    fn macd_line_is_fast_minus_slow() {
        let prices: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
        let bars = make_bars(&prices);
        let macd = calculate_macd(&bars, 3, 6, 4);
        let fast = calculate_ema(&bars, 3);
        let slow = calculate_ema(&bars, 6);

        for i in 0..bars.len() {
            assert!((macd.line[i] - (fast[i] - slow[i])).abs() < 1e-12);
            assert!((macd.histogram[i] - (macd.line[i] - macd.signal[i])).abs() < 1e-12);
        }
    }

    #[test]
    fn macd_positive_in_uptrend() {
        let prices: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let macd = calculate_macd(&make_bars(&prices), DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL);
        assert!(macd.line[59] > 0.0);
        assert!(macd.histogram[59] > 0.0);
    }

    #[test]
    fn macd_negative_in_downtrend() {
        let prices: Vec<f64> = (0..60).map(|i| 200.0 - i as f64).collect();
        let macd = calculate_macd(&make_bars(&prices), DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL);
        assert!(macd.line[59] < 0.0);
    }

    #[test]
    fn macd_zero_period_is_undefined() {
        let macd = calculate_macd(&make_bars(&[1.0, 2.0]), 0, 26, 9);
        assert!(macd.line.iter().all(|v| v.is_nan()));
        assert!(macd.signal.iter().all(|v| v.is_nan()));
        assert!(macd.histogram.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn macd_empty_bars() {
        let macd = calculate_macd(&[], 12, 26, 9);
        assert!(macd.line.is_empty());
    }
}
