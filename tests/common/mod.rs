#![allow(dead_code)]

use chrono::NaiveDate;
use std::collections::HashMap;

use stratbench::domain::error::{StratbenchError, StrategyError};
pub use stratbench::domain::ohlcv::OhlcvBar;
use stratbench::domain::price_series::PriceSeries;
use stratbench::domain::signal::Signal;
use stratbench::domain::strategy::Strategy;
use stratbench::ports::data_port::DataPort;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, ticker: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(ticker.to_string(), bars);
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_series(
        &self,
        ticker: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<PriceSeries, StratbenchError> {
        let bars: Vec<OhlcvBar> = self
            .data
            .get(ticker)
            .into_iter()
            .flatten()
            .filter(|b| start_date.is_none_or(|s| b.date >= s))
            .filter(|b| end_date.is_none_or(|e| b.date <= e))
            .cloned()
            .collect();
        if bars.is_empty() {
            return Err(StratbenchError::NoData {
                ticker: ticker.to_string(),
            });
        }
        Ok(PriceSeries::new(ticker, bars))
    }

    fn list_tickers(&self) -> Result<Vec<String>, StratbenchError> {
        let mut tickers: Vec<String> = self.data.keys().cloned().collect();
        tickers.sort();
        Ok(tickers)
    }
}

/// Emits BUY and SELL at fixed bar indices, HOLD elsewhere.
pub struct ScriptedStrategy {
    pub buys: Vec<usize>,
    pub sells: Vec<usize>,
}

impl ScriptedStrategy {
    pub fn new(buys: &[usize], sells: &[usize]) -> Self {
        Self {
            buys: buys.to_vec(),
            sells: sells.to_vec(),
        }
    }

    pub fn hold_only() -> Self {
        Self::new(&[], &[])
    }
}

impl Strategy for ScriptedStrategy {
    fn name(&self) -> &str {
        "Scripted"
    }

    fn generate_signal(
        &self,
        _bar: &OhlcvBar,
        index: usize,
        _series: &PriceSeries,
    ) -> Result<Signal, StrategyError> {
        if self.buys.contains(&index) {
            Ok(Signal::Buy)
        } else if self.sells.contains(&index) {
            Ok(Signal::Sell)
        } else {
            Ok(Signal::Hold)
        }
    }
}

/// Fails in `init` or at a given bar.
pub struct FailingStrategy {
    pub fail_init: bool,
    pub fail_at: Option<usize>,
}

impl Strategy for FailingStrategy {
    fn name(&self) -> &str {
        "Failing"
    }

    fn init(&self, series: PriceSeries) -> Result<PriceSeries, StrategyError> {
        if self.fail_init {
            return Err(StrategyError::new("Failing", "init exploded"));
        }
        Ok(series)
    }

    fn generate_signal(
        &self,
        _bar: &OhlcvBar,
        index: usize,
        _series: &PriceSeries,
    ) -> Result<Signal, StrategyError> {
        if self.fail_at == Some(index) {
            return Err(StrategyError::new("Failing", format!("bad bar {}", index)));
        }
        Ok(Signal::Hold)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(date: NaiveDate, close: f64) -> OhlcvBar {
    OhlcvBar {
        date,
        open: close,
        high: close + 1.0,
        low: (close - 1.0).max(0.0),
        close,
        volume: 1_000.0,
    }
}

/// One bar per calendar day starting 2024-01-01.
pub fn bars_from_closes(closes: &[f64]) -> Vec<OhlcvBar> {
    let start = date(2024, 1, 1);
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| make_bar(start + chrono::Duration::days(i as i64), close))
        .collect()
}

pub fn series_from_closes(ticker: &str, closes: &[f64]) -> PriceSeries {
    PriceSeries::new(ticker, bars_from_closes(closes))
}

/// `count` closes moving linearly from `from` to `to`.
pub fn linear_closes(count: usize, from: f64, to: f64) -> Vec<f64> {
    if count < 2 {
        return vec![from; count];
    }
    let step = (to - from) / (count - 1) as f64;
    (0..count).map(|i| from + step * i as f64).collect()
}

/// Oscillating closes that trigger every built-in strategy at least once.
pub fn wave_closes(count: usize) -> Vec<f64> {
    (0..count)
        .map(|i| {
            let t = i as f64;
            100.0 + (t * 0.15).sin() * 15.0 + (t * 0.05).cos() * 5.0
        })
        .collect()
}

/// CSV text for `bars` in the layout the CSV adapter reads.
pub fn bars_to_csv(bars: &[OhlcvBar]) -> String {
    let mut out = String::from("date,open,high,low,close,volume\n");
    for b in bars {
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            b.date, b.open, b.high, b.low, b.close, b.volume
        ));
    }
    out
}
