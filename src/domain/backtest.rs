//! Backtest engine and event loop.
//!
//! One run owns one [`Portfolio`]. The loop is strictly sequential over bars;
//! independent runs can be spread across threads with [`run_parallel`].

use rayon::prelude::*;
use std::collections::HashMap;
use tracing::{debug, info, trace};

use super::error::{StratbenchError, StrategyError};
use super::metrics::BacktestResult;
use super::portfolio::{OrderOutcome, Portfolio};
use super::price_series::PriceSeries;
use super::signal::Signal;
use super::strategy::Strategy;

pub const DEFAULT_INITIAL_CASH: f64 = 10_000.0;
pub const DEFAULT_COMMISSION: f64 = 0.0;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub initial_cash: f64,
    /// Flat amount charged per fill.
    pub commission: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            initial_cash: DEFAULT_INITIAL_CASH,
            commission: DEFAULT_COMMISSION,
        }
    }
}

impl BacktestConfig {
    pub fn validate(&self) -> Result<(), StratbenchError> {
        if !self.initial_cash.is_finite() || self.initial_cash <= 0.0 {
            return Err(StratbenchError::invalid_input(format!(
                "initial cash must be positive, got {}",
                self.initial_cash
            )));
        }
        if !self.commission.is_finite() || self.commission < 0.0 {
            return Err(StratbenchError::invalid_input(format!(
                "commission must be non-negative, got {}",
                self.commission
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Backtester {
    config: BacktestConfig,
}

impl Backtester {
    pub fn new(config: BacktestConfig) -> Self {
        Backtester { config }
    }

    pub fn config(&self) -> &BacktestConfig {
        &self.config
    }

    /// Run `strategy` over `series` and summarize the outcome.
    ///
    /// Input is validated before the strategy is touched. Any strategy error
    /// aborts the run.
    pub fn run(
        &self,
        strategy: &dyn Strategy,
        series: PriceSeries,
    ) -> Result<BacktestResult, StratbenchError> {
        self.config.validate()?;
        series.validate()?;

        let name = strategy.name().to_string();
        let ticker = series.ticker.clone();
        let bar_count = series.len();

        info!(
            strategy = %name,
            ticker = %ticker,
            bars = bar_count,
            initial_cash = self.config.initial_cash,
            "Starting backtest"
        );

        let series = strategy.init(series)?;
        if series.len() != bar_count {
            return Err(StrategyError::new(
                &name,
                format!("init returned {} bars, expected {}", series.len(), bar_count),
            )
            .into());
        }

        let mut portfolio = Portfolio::new(self.config.initial_cash, self.config.commission)?;
        let mut prices: HashMap<String, f64> = HashMap::with_capacity(1);

        for (index, bar) in series.bars().iter().enumerate() {
            let outcome = match strategy.generate_signal(bar, index, &series)? {
                Signal::Buy => Some(portfolio.buy(bar.date, &ticker, bar.close, None)),
                Signal::Sell => Some(portfolio.sell(bar.date, &ticker, bar.close, None)),
                Signal::Hold => None,
            };
            if let Some(outcome) = outcome {
                log_outcome(index, &outcome);
            }

            prices.insert(ticker.clone(), bar.close);
            let equity = portfolio.total_value(&prices);
            portfolio.record_equity(bar.date, equity);
        }

        if let Some(last) = series.last() {
            if portfolio.has_position(&ticker) {
                let outcome = portfolio.sell(last.date, &ticker, last.close, None);
                debug!(date = %last.date, price = last.close, "Forced liquidation at final bar");
                log_outcome(bar_count - 1, &outcome);
                let equity = portfolio.total_value(&prices);
                portfolio.restate_last_equity(equity);
            }
        }

        let result = BacktestResult::build(&name, &series, &portfolio);
        info!(
            strategy = %name,
            ticker = %ticker,
            final_value = result.final_value,
            total_return_pct = result.total_return_pct,
            trades = result.total_trades,
            "Backtest complete"
        );
        Ok(result)
    }
}

fn log_outcome(index: usize, outcome: &OrderOutcome) {
    match outcome {
        OrderOutcome::Filled(trade) => debug!(
            index,
            action = %trade.action,
            shares = trade.shares,
            price = trade.price,
            "Order filled"
        ),
        OrderOutcome::Rejected(reason) => trace!(index, ?reason, "Order rejected"),
    }
}

/// Run every strategy over its own copy of `series` on the rayon pool.
///
/// Results come back in the order of `strategies`; one failing run does not
/// affect the others.
pub fn run_parallel(
    backtester: &Backtester,
    strategies: &[Box<dyn Strategy>],
    series: &PriceSeries,
) -> Vec<Result<BacktestResult, StratbenchError>> {
    info!(
        jobs = strategies.len(),
        threads = rayon::current_num_threads(),
        "Starting parallel backtests"
    );
    strategies
        .par_iter()
        .map(|strategy| backtester.run(strategy.as_ref(), series.clone()))
        .collect()
}
