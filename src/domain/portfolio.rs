//! Portfolio state, order execution and equity tracking.
//!
//! Long-only, whole shares, flat commission per fill. Cash and share counts
//! never go negative; an order that would break that is rejected and leaves
//! the portfolio untouched.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::error::StratbenchError;
use super::trade::{Trade, TradeAction};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub equity: f64,
}

/// Why an order did not fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    InvalidPrice,
    ZeroShares,
    InsufficientCash,
    NoPosition,
}

/// Result of a buy or sell attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderOutcome {
    Filled(Trade),
    Rejected(RejectReason),
}

impl OrderOutcome {
    pub fn is_filled(&self) -> bool {
        matches!(self, OrderOutcome::Filled(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    pub cash: f64,
    pub initial_cash: f64,
    pub commission: f64,
    pub positions: HashMap<String, u64>,
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<EquityPoint>,
}

impl Portfolio {
    pub fn new(initial_cash: f64, commission: f64) -> Result<Self, StratbenchError> {
        if !initial_cash.is_finite() || initial_cash <= 0.0 {
            return Err(StratbenchError::invalid_input(format!(
                "initial cash must be positive, got {}",
                initial_cash
            )));
        }
        if !commission.is_finite() || commission < 0.0 {
            return Err(StratbenchError::invalid_input(format!(
                "commission must be non-negative, got {}",
                commission
            )));
        }

        Ok(Portfolio {
            cash: initial_cash,
            initial_cash,
            commission,
            positions: HashMap::new(),
            trades: Vec::new(),
            equity_curve: Vec::new(),
        })
    }

    /// Buy `shares` of `ticker` at `price`.
    ///
    /// With `shares` omitted the order goes all-in:
    /// `floor((cash - commission) / price)` shares.
    pub fn buy(
        &mut self,
        date: NaiveDate,
        ticker: &str,
        price: f64,
        shares: Option<u64>,
    ) -> OrderOutcome {
        if !price.is_finite() || price <= 0.0 {
            return OrderOutcome::Rejected(RejectReason::InvalidPrice);
        }

        let shares = shares.unwrap_or_else(|| {
            let spendable = self.cash - self.commission;
            if spendable <= 0.0 {
                0
            } else {
                (spendable / price).floor() as u64
            }
        });
        if shares == 0 {
            return OrderOutcome::Rejected(RejectReason::ZeroShares);
        }

        let total_cost = shares as f64 * price + self.commission;
        if total_cost > self.cash {
            return OrderOutcome::Rejected(RejectReason::InsufficientCash);
        }

        self.cash -= total_cost;
        *self.positions.entry(ticker.to_string()).or_insert(0) += shares;

        let trade = Trade::new(
            date,
            ticker,
            TradeAction::Buy,
            shares,
            price,
            self.commission,
        );
        self.trades.push(trade.clone());
        OrderOutcome::Filled(trade)
    }

    /// Sell `shares` of `ticker` at `price`, defaulting to the whole position.
    ///
    /// Requests larger than the position are clamped to it.
    pub fn sell(
        &mut self,
        date: NaiveDate,
        ticker: &str,
        price: f64,
        shares: Option<u64>,
    ) -> OrderOutcome {
        let held = self.shares_held(ticker);
        if held == 0 {
            return OrderOutcome::Rejected(RejectReason::NoPosition);
        }
        if !price.is_finite() || price <= 0.0 {
            return OrderOutcome::Rejected(RejectReason::InvalidPrice);
        }

        let shares = shares.unwrap_or(held).min(held);
        if shares == 0 {
            return OrderOutcome::Rejected(RejectReason::ZeroShares);
        }

        let proceeds = shares as f64 * price - self.commission;
        if self.cash + proceeds < 0.0 {
            return OrderOutcome::Rejected(RejectReason::InsufficientCash);
        }

        self.cash += proceeds;
        let remaining = held - shares;
        if remaining == 0 {
            self.positions.remove(ticker);
        } else {
            self.positions.insert(ticker.to_string(), remaining);
        }

        let trade = Trade::new(
            date,
            ticker,
            TradeAction::Sell,
            shares,
            price,
            self.commission,
        );
        self.trades.push(trade.clone());
        OrderOutcome::Filled(trade)
    }

    pub fn shares_held(&self, ticker: &str) -> u64 {
        self.positions.get(ticker).copied().unwrap_or(0)
    }

    pub fn has_position(&self, ticker: &str) -> bool {
        self.positions.contains_key(ticker)
    }

    /// Cash plus every position marked at its price in `prices`.
    ///
    /// A position without a quoted price contributes nothing.
    pub fn total_value(&self, prices: &HashMap<String, f64>) -> f64 {
        let position_value: f64 = self
            .positions
            .iter()
            .filter_map(|(ticker, &shares)| {
                prices.get(ticker).map(|&price| shares as f64 * price)
            })
            .sum();
        self.cash + position_value
    }

    pub fn record_equity(&mut self, date: NaiveDate, equity: f64) {
        self.equity_curve.push(EquityPoint { date, equity });
    }

    /// Overwrite the most recent equity sample.
    pub fn restate_last_equity(&mut self, equity: f64) {
        if let Some(last) = self.equity_curve.last_mut() {
            last.equity = equity;
        }
    }
}
