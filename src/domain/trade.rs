//! Executed order records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeAction {
    Buy,
    Sell,
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeAction::Buy => f.pad("BUY"),
            TradeAction::Sell => f.pad("SELL"),
        }
    }
}

/// One filled order. Only the portfolio creates these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub date: NaiveDate,
    pub ticker: String,
    pub action: TradeAction,
    pub shares: u64,
    pub price: f64,
    pub value: f64,
    pub commission: f64,
}

impl Trade {
    pub(crate) fn new(
        date: NaiveDate,
        ticker: &str,
        action: TradeAction,
        shares: u64,
        price: f64,
        commission: f64,
    ) -> Self {
        Trade {
            date,
            ticker: ticker.to_string(),
            action,
            shares,
            price,
            value: shares as f64 * price,
            commission,
        }
    }
}
