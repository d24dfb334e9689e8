//! CSV file data adapter.
//!
//! Reads `<TICKER>.csv` files from a base directory. Each file has the header
//! `date,open,high,low,close,volume` with `YYYY-MM-DD` dates.

use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::domain::error::StratbenchError;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::price_series::PriceSeries;
use crate::ports::data_port::DataPort;

const EXTENSION: &str = "csv";

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.{}", ticker, EXTENSION))
    }

    fn read_bars(&self, path: &Path) -> Result<Vec<OhlcvBar>, StratbenchError> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| StratbenchError::Data {
                reason: format!("failed to read {}: {}", path.display(), e),
            })?;

        rdr.deserialize::<OhlcvBar>()
            .enumerate()
            .map(|(i, row)| {
                row.map_err(|e| StratbenchError::Data {
                    reason: format!("{} row {}: {}", path.display(), i + 1, e),
                })
            })
            .collect()
    }
}

impl DataPort for CsvAdapter {
    fn fetch_series(
        &self,
        ticker: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<PriceSeries, StratbenchError> {
        let path = self.csv_path(ticker);
        if !path.is_file() {
            return Err(StratbenchError::NoData {
                ticker: ticker.to_string(),
            });
        }

        let mut bars: Vec<OhlcvBar> = self
            .read_bars(&path)?
            .into_iter()
            .filter(|b| start_date.is_none_or(|start| b.date >= start))
            .filter(|b| end_date.is_none_or(|end| b.date <= end))
            .collect();

        if bars.is_empty() {
            return Err(StratbenchError::NoData {
                ticker: ticker.to_string(),
            });
        }

        bars.sort_by_key(|b| b.date);
        debug!(ticker, bars = bars.len(), path = %path.display(), "Loaded price data");
        Ok(PriceSeries::new(ticker, bars))
    }

    fn list_tickers(&self) -> Result<Vec<String>, StratbenchError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| StratbenchError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut tickers = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == EXTENSION) {
                if let Some(stem) = path.file_stem() {
                    tickers.push(stem.to_string_lossy().into_owned());
                }
            }
        }

        tickers.sort();
        Ok(tickers)
    }
}
