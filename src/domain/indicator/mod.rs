//! Technical indicator implementations.
//!
//! Every indicator is a pure function from bars to one or more `Vec<f64>`
//! columns aligned with the input. Bars before the lookback window is satisfied
//! hold `f64::NAN`. `IndicatorType` names an indicator with its parameters and is
//! what [`PriceSeries::with_indicator`](crate::domain::price_series::PriceSeries::with_indicator)
//! materializes.

pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod keltner;
pub mod macd;
pub mod mfi;
pub mod obv;
pub mod roc;
pub mod rsi;
pub mod sma;
pub mod stddev;
pub mod stochastic;
pub mod vwap;
pub mod williams_r;
pub mod wma;

pub use atr::calculate_atr;
pub use bollinger::calculate_bollinger;
pub use ema::calculate_ema;
pub use keltner::calculate_keltner;
pub use macd::calculate_macd;
pub use mfi::calculate_mfi;
pub use obv::calculate_obv;
pub use roc::calculate_roc;
pub use rsi::calculate_rsi;
pub use sma::calculate_sma;
pub use stddev::calculate_stddev;
pub use stochastic::calculate_stochastic;
pub use vwap::calculate_vwap;
pub use williams_r::calculate_williams_r;
pub use wma::calculate_wma;

use crate::domain::ohlcv::OhlcvBar;
use std::fmt;

/// MACD line, signal line and histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub line: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

/// Upper/middle/lower envelope (Bollinger, Keltner).
#[derive(Debug, Clone, PartialEq)]
pub struct BandSeries {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

/// Stochastic %K and %D.
#[derive(Debug, Clone, PartialEq)]
pub struct StochasticSeries {
    pub k: Vec<f64>,
    pub d: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    Wma(usize),
    Rsi(usize),
    Roc(usize),
    Atr(usize),
    Stddev(usize),
    WilliamsR(usize),
    Mfi(usize),
    Obv,
    Vwap,
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    Stochastic {
        k_period: usize,
        d_period: usize,
    },
    Bollinger {
        period: usize,
        stddev_mult_x100: u32,
    },
    Keltner {
        ema_period: usize,
        atr_period: usize,
        mult_x100: u32,
    },
}

/// Encode a band multiplier as hundredths so `IndicatorType` stays hashable.
pub fn mult_to_x100(mult: f64) -> u32 {
    (mult * 100.0).round().max(0.0) as u32
}

fn x100_to_mult(x100: u32) -> f64 {
    x100 as f64 / 100.0
}

impl IndicatorType {
    fn params(&self) -> String {
        match self {
            IndicatorType::Sma(p)
            | IndicatorType::Ema(p)
            | IndicatorType::Wma(p)
            | IndicatorType::Rsi(p)
            | IndicatorType::Roc(p)
            | IndicatorType::Atr(p)
            | IndicatorType::Stddev(p)
            | IndicatorType::WilliamsR(p)
            | IndicatorType::Mfi(p) => p.to_string(),
            IndicatorType::Obv | IndicatorType::Vwap => String::new(),
            IndicatorType::Macd { fast, slow, signal } => format!("{},{},{}", fast, slow, signal),
            IndicatorType::Stochastic { k_period, d_period } => {
                format!("{},{}", k_period, d_period)
            }
            IndicatorType::Bollinger {
                period,
                stddev_mult_x100,
            } => format!("{},{}", period, x100_to_mult(*stddev_mult_x100)),
            IndicatorType::Keltner {
                ema_period,
                atr_period,
                mult_x100,
            } => format!("{},{},{}", ema_period, atr_period, x100_to_mult(*mult_x100)),
        }
    }

    /// Names of the columns this indicator materializes, in `compute` order.
    pub fn column_names(&self) -> Vec<String> {
        let p = self.params();
        match self {
            IndicatorType::Macd { .. } => vec![
                format!("MACD({p})"),
                format!("MACD_SIGNAL({p})"),
                format!("MACD_HIST({p})"),
            ],
            IndicatorType::Stochastic { .. } => {
                vec![format!("STOCH_K({p})"), format!("STOCH_D({p})")]
            }
            IndicatorType::Bollinger { .. } => vec![
                format!("BB_UPPER({p})"),
                format!("BB_MIDDLE({p})"),
                format!("BB_LOWER({p})"),
            ],
            IndicatorType::Keltner { .. } => vec![
                format!("KC_UPPER({p})"),
                format!("KC_MIDDLE({p})"),
                format!("KC_LOWER({p})"),
            ],
            _ => vec![self.to_string()],
        }
    }

    /// Compute every output column over `bars`.
    pub fn compute(&self, bars: &[OhlcvBar]) -> Vec<Vec<f64>> {
        match *self {
            IndicatorType::Sma(p) => vec![calculate_sma(bars, p)],
            IndicatorType::Ema(p) => vec![calculate_ema(bars, p)],
            IndicatorType::Wma(p) => vec![calculate_wma(bars, p)],
            IndicatorType::Rsi(p) => vec![calculate_rsi(bars, p)],
            IndicatorType::Roc(p) => vec![calculate_roc(bars, p)],
            IndicatorType::Atr(p) => vec![calculate_atr(bars, p)],
            IndicatorType::Stddev(p) => vec![calculate_stddev(bars, p)],
            IndicatorType::WilliamsR(p) => vec![calculate_williams_r(bars, p)],
            IndicatorType::Mfi(p) => vec![calculate_mfi(bars, p)],
            IndicatorType::Obv => vec![calculate_obv(bars)],
            IndicatorType::Vwap => vec![calculate_vwap(bars)],
            IndicatorType::Macd { fast, slow, signal } => {
                let macd = calculate_macd(bars, fast, slow, signal);
                vec![macd.line, macd.signal, macd.histogram]
            }
            IndicatorType::Stochastic { k_period, d_period } => {
                let stoch = calculate_stochastic(bars, k_period, d_period);
                vec![stoch.k, stoch.d]
            }
            IndicatorType::Bollinger {
                period,
                stddev_mult_x100,
            } => {
                let bands = calculate_bollinger(bars, period, x100_to_mult(stddev_mult_x100));
                vec![bands.upper, bands.middle, bands.lower]
            }
            IndicatorType::Keltner {
                ema_period,
                atr_period,
                mult_x100,
            } => {
                let bands =
                    calculate_keltner(bars, ema_period, atr_period, x100_to_mult(mult_x100));
                vec![bands.upper, bands.middle, bands.lower]
            }
        }
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IndicatorType::Sma(_) => "SMA",
            IndicatorType::Ema(_) => "EMA",
            IndicatorType::Wma(_) => "WMA",
            IndicatorType::Rsi(_) => "RSI",
            IndicatorType::Roc(_) => "ROC",
            IndicatorType::Atr(_) => "ATR",
            IndicatorType::Stddev(_) => "STDDEV",
            IndicatorType::WilliamsR(_) => "WILLR",
            IndicatorType::Mfi(_) => "MFI",
            IndicatorType::Obv => return write!(f, "OBV"),
            IndicatorType::Vwap => return write!(f, "VWAP"),
            IndicatorType::Macd { .. } => "MACD",
            IndicatorType::Stochastic { .. } => "STOCHASTIC",
            IndicatorType::Bollinger { .. } => "BOLLINGER",
            IndicatorType::Keltner { .. } => "KELTNER",
        };
        write!(f, "{}({})", name, self.params())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_bars(count: usize) -> Vec<OhlcvBar> {
        (0..count)
            .map(|i| {
                let close = 100.0 + (i as f64 * 0.7).sin() * 5.0;
                OhlcvBar {
                    date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                        + chrono::Duration::days(i as i64),
                    open: close,
                    high: close + 1.0,
                    low: close - 1.0,
                    close,
                    volume: 1000.0,
                }
            })
            .collect()
    }

    #[test]
    fn indicator_type_display_sma() {
        assert_eq!(IndicatorType::Sma(20).to_string(), "SMA(20)");
    }

    #[test]
    fn indicator_type_display_macd() {
        let macd = IndicatorType::Macd {
            fast: 12,
            slow: 26,
            signal: 9,
        };
        assert_eq!(macd.to_string(), "MACD(12,26,9)");
    }

    #[test]
    fn indicator_type_display_bollinger() {
        let boll = IndicatorType::Bollinger {
            period: 20,
            stddev_mult_x100: 200,
        };
        assert_eq!(boll.to_string(), "BOLLINGER(20,2)");
    }

    #[test]
    fn indicator_type_display_unparameterized() {
        assert_eq!(IndicatorType::Obv.to_string(), "OBV");
        assert_eq!(IndicatorType::Vwap.to_string(), "VWAP");
    }

    #[test]
    fn column_names_for_bands() {
        let boll = IndicatorType::Bollinger {
            period: 20,
            stddev_mult_x100: mult_to_x100(2.5),
        };
        assert_eq!(
            boll.column_names(),
            vec!["BB_UPPER(20,2.5)", "BB_MIDDLE(20,2.5)", "BB_LOWER(20,2.5)"]
        );

        let kc = IndicatorType::Keltner {
            ema_period: 20,
            atr_period: 14,
            mult_x100: 200,
        };
        assert_eq!(kc.column_names()[1], "KC_MIDDLE(20,14,2)");
    }

    #[test]
    fn compute_matches_column_count_and_length() {
        let bars = make_bars(40);
        let all = [
            IndicatorType::Sma(5),
            IndicatorType::Ema(5),
            IndicatorType::Wma(5),
            IndicatorType::Rsi(14),
            IndicatorType::Roc(12),
            IndicatorType::Atr(14),
            IndicatorType::Stddev(10),
            IndicatorType::WilliamsR(14),
            IndicatorType::Mfi(14),
            IndicatorType::Obv,
            IndicatorType::Vwap,
            IndicatorType::Macd {
                fast: 12,
                slow: 26,
                signal: 9,
            },
            IndicatorType::Stochastic {
                k_period: 14,
                d_period: 3,
            },
            IndicatorType::Bollinger {
                period: 20,
                stddev_mult_x100: 200,
            },
            IndicatorType::Keltner {
                ema_period: 20,
                atr_period: 14,
                mult_x100: 200,
            },
        ];

        for indicator in &all {
            let columns = indicator.compute(&bars);
            assert_eq!(columns.len(), indicator.column_names().len(), "{indicator}");
            for col in &columns {
                assert_eq!(col.len(), bars.len(), "{indicator}");
            }
        }
    }

    #[test]
    fn indicator_type_hash_eq() {
        use std::collections::HashMap;

        let mut map = HashMap::new();
        map.insert(IndicatorType::Sma(20), "sma20");
        map.insert(IndicatorType::Sma(50), "sma50");

        assert_eq!(map.get(&IndicatorType::Sma(20)), Some(&"sma20"));
        assert_eq!(map.get(&IndicatorType::Sma(50)), Some(&"sma50"));
        assert_eq!(map.get(&IndicatorType::Ema(20)), None);
    }

    #[test]
    fn mult_round_trip() {
        assert_eq!(mult_to_x100(2.0), 200);
        assert_eq!(mult_to_x100(1.5), 150);
        assert_eq!(mult_to_x100(-1.0), 0);
    }
}
