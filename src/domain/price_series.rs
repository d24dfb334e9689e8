//! Ordered price series with materialized indicator columns.
//!
//! Columns are aligned 1:1 with the bars. An undefined value is stored as
//! `f64::NAN` and surfaces as `None` through [`PriceSeries::value`].

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::domain::error::StratbenchError;
use crate::domain::indicator::IndicatorType;
use crate::domain::ohlcv::OhlcvBar;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    pub ticker: String,
    bars: Vec<OhlcvBar>,
    columns: BTreeMap<String, Vec<f64>>,
}

impl PriceSeries {
    pub fn new(ticker: impl Into<String>, bars: Vec<OhlcvBar>) -> Self {
        PriceSeries {
            ticker: ticker.into(),
            bars,
            columns: BTreeMap::new(),
        }
    }

    /// Reject empty series, non-increasing dates and malformed bars.
    pub fn validate(&self) -> Result<(), StratbenchError> {
        if self.bars.is_empty() {
            return Err(StratbenchError::invalid_input(format!(
                "price series for {} is empty",
                self.ticker
            )));
        }

        for (i, pair) in self.bars.windows(2).enumerate() {
            if pair[1].date <= pair[0].date {
                return Err(StratbenchError::invalid_input(format!(
                    "price series for {} is not strictly increasing at index {} ({} follows {})",
                    self.ticker,
                    i + 1,
                    pair[1].date,
                    pair[0].date
                )));
            }
        }

        if let Some((i, bar)) = self
            .bars
            .iter()
            .enumerate()
            .find(|(_, bar)| !bar.is_well_formed())
        {
            return Err(StratbenchError::invalid_input(format!(
                "bar {} ({}) of {} is not a well-formed OHLCV bar",
                i, bar.date, self.ticker
            )));
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[OhlcvBar] {
        &self.bars
    }

    pub fn first(&self) -> Option<&OhlcvBar> {
        self.bars.first()
    }

    pub fn last(&self) -> Option<&OhlcvBar> {
        self.bars.last()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Compute `indicator` over the bars and attach its columns.
    pub fn with_indicator(mut self, indicator: &IndicatorType) -> Self {
        let names = indicator.column_names();
        let outputs = indicator.compute(&self.bars);
        for (name, values) in names.into_iter().zip(outputs) {
            self.columns.insert(name, values);
        }
        self
    }

    pub fn insert_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<(), StratbenchError> {
        let name = name.into();
        if values.len() != self.bars.len() {
            return Err(StratbenchError::invalid_input(format!(
                "column {} has {} values for {} bars",
                name,
                values.len(),
                self.bars.len()
            )));
        }
        self.columns.insert(name, values);
        Ok(())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(|v| v.as_slice())
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(|k| k.as_str())
    }

    /// Value of `name` at `index`, or `None` when missing or undefined.
    pub fn value(&self, name: &str, index: usize) -> Option<f64> {
        self.columns
            .get(name)
            .and_then(|col| col.get(index))
            .copied()
            .filter(|v| !v.is_nan())
    }

    /// Copy of the first `len` bars and the matching prefix of every column.
    pub fn truncated(&self, len: usize) -> Self {
        let len = len.min(self.bars.len());
        PriceSeries {
            ticker: self.ticker.clone(),
            bars: self.bars[..len].to_vec(),
            columns: self
                .columns
                .iter()
                .map(|(name, values)| (name.clone(), values[..len].to_vec()))
                .collect(),
        }
    }
}
