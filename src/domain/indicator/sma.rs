//! Simple Moving Average indicator.
//!
//! SMA(n)[i] = mean(C[i-n+1..=i]). Warmup: first (n-1) bars are undefined.

use crate::domain::indicator_helpers::rolling_mean;
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_sma(bars: &[OhlcvBar], period: usize) -> Vec<f64> {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    rolling_mean(&closes, period)
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
    fn sma_warmup_is_period_minus_one() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let sma = calculate_sma(&bars, 3);

        assert!(sma[0].is_nan());
        assert!(sma[1].is_nan());
        assert!(sma[2..].iter().all(|v| !v.is_nan()));
    }

    #[test]
    fn sma_values() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let sma = calculate_sma(&bars, 3);

        assert!((sma[2] - 20.0).abs() < 1e-12);
        assert!((sma[3] - 30.0).abs() < 1e-12);
        assert!((sma[4] - 40.0).abs() < 1e-12);
    }

    #[test]
    fn sma_period_1_equals_close() {
        let bars = make_bars(&[10.0, 20.0]);
        assert_eq!(calculate_sma(&bars, 1), vec![10.0, 20.0]);
    }

    #[test]
    fn sma_shorter_than_period_is_all_undefined() {
        let bars = make_bars(&[10.0, 20.0]);
        let sma = calculate_sma(&bars, 5);
        assert_eq!(sma.len(), 2);
        assert!(sma.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn sma_empty_bars() {
        assert!(calculate_sma(&[], 3).is_empty());
    }
}
