//! OBV (On-Balance Volume) indicator implementation.

use crate::domain::ohlcv::OhlcvBar;

/// Calculate OBV (On-Balance Volume).
///
/// OBV[0] = 0
/// If close[i] > close[i-1]: OBV[i] = OBV[i-1] + volume[i]
/// If close[i] < close[i-1]: OBV[i] = OBV[i-1] - volume[i]
/// If close[i] == close[i-1]: OBV[i] = OBV[i-1]
///
/// No warmup period; all bars are defined.
pub fn calculate_obv(bars: &[OhlcvBar]) -> Vec<f64> {
    let mut values = Vec::with_capacity(bars.len());
    let mut obv = 0.0;

    for (i, bar) in bars.iter().enumerate() {
        if i > 0 {
            let prev_close = bars[i - 1].close;
            if bar.close > prev_close {
                obv += bar.volume;
            } else if bar.close < prev_close {
                obv -= bar.volume;
            }
        }
        values.push(obv);
    }

    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_bar(date: &str, close: f64, volume: f64) -> OhlcvBar {
        OhlcvBar {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume,
        }
    }

    #[test]
    fn obv_empty() {
        assert!(calculate_obv(&[]).is_empty());
    }

    #[test]
    fn obv_first_bar_is_zero() {
        let obv = calculate_obv(&[make_bar("2024-01-01", 10.0, 500.0)]);
        assert_eq!(obv, vec![0.0]);
    }

    #[test]
    fn obv_accumulates_signed_volume() {
        let bars = vec![
            make_bar("2024-01-01", 10.0, 100.0),
            make_bar("2024-01-02", 11.0, 200.0),
            make_bar("2024-01-03", 10.5, 50.0),
            make_bar("2024-01-04", 10.5, 999.0),
            make_bar("2024-01-05", 12.0, 25.0),
        ];
        assert_eq!(calculate_obv(&bars), vec![0.0, 200.0, 150.0, 150.0, 175.0]);
    }
}
