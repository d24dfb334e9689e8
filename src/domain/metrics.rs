//! Performance metrics and the backtest result summary.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};

use super::portfolio::{EquityPoint, Portfolio};
use super::price_series::PriceSeries;
use super::trade::{Trade, TradeAction};

const TRADING_DAYS_PER_YEAR: f64 = 252.0;
const CALENDAR_DAYS_PER_YEAR: f64 = 365.0;

/// A SELL matched with the earliest unmatched BUY of the same ticker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradePair {
    pub ticker: String,
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    pub entry_price: f64,
    pub exit_price: f64,
    pub pnl_pct: f64,
}

impl TradePair {
    pub fn is_win(&self) -> bool {
        self.pnl_pct >= 0.0
    }

    pub fn holding_days(&self) -> i64 {
        (self.exit_date - self.entry_date).num_days()
    }
}

/// Summary of one finished run. Percent fields are in percent units.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacktestResult {
    pub strategy: String,
    pub ticker: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub initial_cash: f64,
    pub final_value: f64,
    pub total_return_pct: f64,
    pub buy_and_hold_return_pct: f64,
    pub annualized_return_pct: f64,
    pub max_drawdown_pct: f64,
    pub max_drawdown_duration: usize,
    pub sharpe: f64,
    pub sortino: f64,
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub win_rate_pct: f64,
    pub avg_win_pct: f64,
    pub avg_loss_pct: f64,
    pub largest_win_pct: f64,
    pub largest_loss_pct: f64,
    /// `+inf` with wins and no losses; serialized as `null` in JSON.
    pub profit_factor: f64,
    pub avg_holding_days: f64,
    pub equity_curve: Vec<EquityPoint>,
    pub trades: Vec<Trade>,
    pub dates: Vec<NaiveDate>,
}

impl BacktestResult {
    /// Derive every statistic from a finished portfolio and its series.
    ///
    /// `series` must be non-empty; the backtester validates it before the run.
    pub fn build(strategy: &str, series: &PriceSeries, portfolio: &Portfolio) -> Self {
        let initial_cash = portfolio.initial_cash;
        let final_value = portfolio
            .equity_curve
            .last()
            .map_or(initial_cash, |p| p.equity);

        let dates = series.dates();
        let start_date = dates.first().copied().unwrap_or_default();
        let end_date = dates.last().copied().unwrap_or(start_date);

        let first_close = series.first().map_or(0.0, |b| b.close);
        let last_close = series.last().map_or(0.0, |b| b.close);

        let total_return_pct = pct_change(initial_cash, final_value);
        let buy_and_hold_return_pct = pct_change(first_close, last_close);

        let days_elapsed = (end_date - start_date).num_days().max(1) as f64;
        let annualized_return_pct = if initial_cash > 0.0 && final_value >= 0.0 {
            ((final_value / initial_cash).powf(CALENDAR_DAYS_PER_YEAR / days_elapsed) - 1.0)
                * 100.0
        } else {
            0.0
        };

        let equity: Vec<f64> = portfolio.equity_curve.iter().map(|p| p.equity).collect();
        let (max_drawdown, max_drawdown_duration) = compute_drawdown(&equity);
        let returns = daily_returns(&equity);
        let (sharpe, sortino) = compute_risk_adjusted(&returns);

        let pairs = pair_trades(&portfolio.trades);
        let stats = TradeStats::from_pairs(&pairs);

        BacktestResult {
            strategy: strategy.to_string(),
            ticker: series.ticker.clone(),
            start_date,
            end_date,
            initial_cash,
            final_value,
            total_return_pct,
            buy_and_hold_return_pct,
            annualized_return_pct,
            max_drawdown_pct: max_drawdown * 100.0,
            max_drawdown_duration,
            sharpe,
            sortino,
            total_trades: stats.wins + stats.losses,
            winning_trades: stats.wins,
            losing_trades: stats.losses,
            win_rate_pct: stats.win_rate_pct,
            avg_win_pct: stats.avg_win_pct,
            avg_loss_pct: stats.avg_loss_pct,
            largest_win_pct: stats.largest_win_pct,
            largest_loss_pct: stats.largest_loss_pct,
            profit_factor: stats.profit_factor,
            avg_holding_days: stats.avg_holding_days,
            equity_curve: portfolio.equity_curve.clone(),
            trades: portfolio.trades.clone(),
            dates,
        }
    }
}

fn pct_change(from: f64, to: f64) -> f64 {
    if from != 0.0 {
        (to - from) / from * 100.0
    } else {
        0.0
    }
}

/// Pair each SELL with the earliest unmatched BUY of the same ticker.
///
/// Unmatched trades on either side produce no pair.
pub fn pair_trades(trades: &[Trade]) -> Vec<TradePair> {
    let mut open: HashMap<&str, VecDeque<&Trade>> = HashMap::new();
    let mut pairs = Vec::new();

    for trade in trades {
        match trade.action {
            TradeAction::Buy => open.entry(trade.ticker.as_str()).or_default().push_back(trade),
            TradeAction::Sell => {
                let Some(entry) = open
                    .get_mut(trade.ticker.as_str())
                    .and_then(|lots| lots.pop_front())
                else {
                    continue;
                };
                pairs.push(TradePair {
                    ticker: trade.ticker.clone(),
                    entry_date: entry.date,
                    exit_date: trade.date,
                    entry_price: entry.price,
                    exit_price: trade.price,
                    pnl_pct: pct_change(entry.price, trade.price),
                });
            }
        }
    }
    pairs
}

#[derive(Debug, Default)]
struct TradeStats {
    wins: usize,
    losses: usize,
    win_rate_pct: f64,
    avg_win_pct: f64,
    avg_loss_pct: f64,
    largest_win_pct: f64,
    largest_loss_pct: f64,
    profit_factor: f64,
    avg_holding_days: f64,
}

impl TradeStats {
    fn from_pairs(pairs: &[TradePair]) -> Self {
        if pairs.is_empty() {
            return TradeStats::default();
        }

        let mut stats = TradeStats::default();
        let mut total_wins = 0.0_f64;
        let mut total_losses = 0.0_f64;
        let mut total_days = 0i64;

        for pair in pairs {
            let pnl = pair.pnl_pct;
            if pair.is_win() {
                stats.wins += 1;
                total_wins += pnl;
                stats.largest_win_pct = stats.largest_win_pct.max(pnl);
            } else {
                stats.losses += 1;
                total_losses += pnl;
                stats.largest_loss_pct = stats.largest_loss_pct.min(pnl);
            }
            total_days += pair.holding_days();
        }

        let total = pairs.len() as f64;
        stats.win_rate_pct = stats.wins as f64 / total * 100.0;
        if stats.wins > 0 {
            stats.avg_win_pct = total_wins / stats.wins as f64;
        }
        if stats.losses > 0 {
            stats.avg_loss_pct = total_losses / stats.losses as f64;
        }
        stats.profit_factor = if total_losses < 0.0 {
            total_wins / total_losses.abs()
        } else if stats.wins > 0 {
            f64::INFINITY
        } else {
            0.0
        };
        stats.avg_holding_days = total_days as f64 / total;
        stats
    }
}

/// Largest peak-to-trough decline as a fraction, and the longest run of
/// consecutive samples spent below a running peak.
fn compute_drawdown(equity: &[f64]) -> (f64, usize) {
    let Some(&first) = equity.first() else {
        return (0.0, 0);
    };

    let mut peak = first;
    let mut max_dd = 0.0_f64;
    let mut max_dd_duration = 0usize;
    let mut current_dd_duration = 0usize;

    for &value in equity {
        if value >= peak {
            peak = value;
            current_dd_duration = 0;
        } else if peak > 0.0 {
            max_dd = max_dd.max((peak - value) / peak);
            current_dd_duration += 1;
            max_dd_duration = max_dd_duration.max(current_dd_duration);
        }
    }

    (max_dd, max_dd_duration)
}

fn daily_returns(equity: &[f64]) -> Vec<f64> {
    equity
        .windows(2)
        .map(|w| if w[0] != 0.0 { (w[1] - w[0]) / w[0] } else { 0.0 })
        .collect()
}

/// Sample (n - 1) standard deviation; zero for fewer than two values.
fn sample_stddev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    variance.sqrt()
}

/// Annualized Sharpe and Sortino ratios with a zero risk-free rate.
fn compute_risk_adjusted(returns: &[f64]) -> (f64, f64) {
    if returns.is_empty() {
        return (0.0, 0.0);
    }

    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    let annualize = TRADING_DAYS_PER_YEAR.sqrt();

    let stddev = sample_stddev(returns);
    let sharpe = if stddev > 0.0 {
        mean / stddev * annualize
    } else {
        0.0
    };

    let negatives: Vec<f64> = returns.iter().copied().filter(|r| *r < 0.0).collect();
    let downside = sample_stddev(&negatives);
    let sortino = if downside > 0.0 {
        mean / downside * annualize
    } else {
        0.0
    };

    (sharpe, sortino)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ohlcv::OhlcvBar;
    use approx::assert_relative_eq;

    fn day(i: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(i)
    }

    fn trade(i: i64, ticker: &str, action: TradeAction, price: f64) -> Trade {
        Trade::new(day(i), ticker, action, 10, price, 0.0)
    }

    fn make_series(closes: &[f64]) -> PriceSeries {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| OhlcvBar {
                date: day(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000.0,
            })
            .collect();
        PriceSeries::new("TEST", bars)
    }

    fn make_portfolio(equity: &[f64], trades: Vec<Trade>) -> Portfolio {
        let mut portfolio = Portfolio::new(equity[0], 0.0).unwrap();
        portfolio.trades = trades;
        for (i, &value) in equity.iter().enumerate() {
            portfolio.record_equity(day(i as i64), value);
        }
        portfolio
    }

    #[test]
    fn fifo_pairs_earliest_buy_first() {
        let trades = vec![
            trade(0, "A", TradeAction::Buy, 100.0),
            trade(1, "A", TradeAction::Buy, 200.0),
            trade(2, "A", TradeAction::Sell, 150.0),
            trade(3, "A", TradeAction::Sell, 150.0),
        ];
        let pairs = pair_trades(&trades);
        assert_eq!(pairs.len(), 2);
        assert_relative_eq!(pairs[0].pnl_pct, 50.0);
        assert_eq!(pairs[0].entry_date, day(0));
        assert_relative_eq!(pairs[1].pnl_pct, -25.0);
    }

    #[test]
    fn unmatched_trades_are_not_paired() {
        let trades = vec![
            trade(0, "A", TradeAction::Sell, 100.0),
            trade(1, "B", TradeAction::Buy, 100.0),
            trade(2, "A", TradeAction::Buy, 100.0),
        ];
        assert!(pair_trades(&trades).is_empty());
    }

    #[test]
    fn pairing_is_per_ticker() {
        let trades = vec![
            trade(0, "A", TradeAction::Buy, 10.0),
            trade(1, "B", TradeAction::Buy, 20.0),
            trade(2, "B", TradeAction::Sell, 30.0),
        ];
        let pairs = pair_trades(&trades);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].ticker, "B");
        assert_relative_eq!(pairs[0].pnl_pct, 50.0);
    }

    #[test]
    fn flat_pair_counts_as_win() {
        let stats = TradeStats::from_pairs(&pair_trades(&[
            trade(0, "A", TradeAction::Buy, 10.0),
            trade(1, "A", TradeAction::Sell, 10.0),
        ]));
        assert_eq!(stats.wins, 1);
        assert_eq!(stats.losses, 0);
        assert!(stats.profit_factor.is_infinite());
    }

    #[test]
    fn trade_stats_mixed() {
        let trades = vec![
            trade(0, "A", TradeAction::Buy, 100.0),
            trade(2, "A", TradeAction::Sell, 110.0),
            trade(3, "A", TradeAction::Buy, 100.0),
            trade(7, "A", TradeAction::Sell, 95.0),
            trade(8, "A", TradeAction::Buy, 100.0),
            trade(9, "A", TradeAction::Sell, 130.0),
        ];
        let stats = TradeStats::from_pairs(&pair_trades(&trades));
        assert_eq!(stats.wins, 2);
        assert_eq!(stats.losses, 1);
        assert_relative_eq!(stats.win_rate_pct, 200.0 / 3.0, epsilon = 1e-9);
        assert_relative_eq!(stats.avg_win_pct, 20.0, epsilon = 1e-9);
        assert_relative_eq!(stats.avg_loss_pct, -5.0, epsilon = 1e-9);
        assert_relative_eq!(stats.largest_win_pct, 30.0, epsilon = 1e-9);
        assert_relative_eq!(stats.largest_loss_pct, -5.0, epsilon = 1e-9);
        assert_relative_eq!(stats.profit_factor, 8.0, epsilon = 1e-9);
        assert_relative_eq!(stats.avg_holding_days, 7.0 / 3.0, epsilon = 1e-9);
    }

    #[test]
    fn no_pairs_gives_zero_stats() {
        let stats = TradeStats::from_pairs(&[]);
        assert_eq!(stats.wins + stats.losses, 0);
        assert_eq!(stats.profit_factor, 0.0);
        assert_eq!(stats.win_rate_pct, 0.0);
    }

    #[test]
    fn max_drawdown() {
        let (dd, _) = compute_drawdown(&[100.0, 110.0, 90.0, 95.0, 80.0, 100.0]);
        assert_relative_eq!(dd, (110.0 - 80.0) / 110.0, epsilon = 1e-12);
    }

    #[test]
    fn max_drawdown_duration() {
        let (_, duration) = compute_drawdown(&[100.0, 110.0, 100.0, 90.0, 85.0, 95.0]);
        assert_eq!(duration, 4);
    }

    #[test]
    fn drawdown_resets_at_new_peak() {
        let (dd, duration) = compute_drawdown(&[100.0, 90.0, 120.0, 110.0, 130.0]);
        assert_relative_eq!(dd, 0.1, epsilon = 1e-12);
        assert_eq!(duration, 1);
    }

    #[test]
    fn flat_equity_has_zero_ratios() {
        let (sharpe, sortino) = compute_risk_adjusted(&daily_returns(&[100.0; 10]));
        assert_eq!(sharpe, 0.0);
        assert_eq!(sortino, 0.0);
    }

    #[test]
    fn sharpe_uses_sample_stddev() {
        let returns = [0.01, 0.03];
        let (sharpe, sortino) = compute_risk_adjusted(&returns);
        // mean 0.02, sample std sqrt(0.0002)
        let expected = 0.02 / 0.0002_f64.sqrt() * 252.0_f64.sqrt();
        assert_relative_eq!(sharpe, expected, epsilon = 1e-9);
        assert_eq!(sortino, 0.0);
    }

    #[test]
    fn sortino_uses_negative_returns_only() {
        let returns = [0.02, -0.01, 0.03, -0.03];
        let (_, sortino) = compute_risk_adjusted(&returns);
        let mean = 0.0025;
        let downside = sample_stddev(&[-0.01, -0.03]);
        assert_relative_eq!(sortino, mean / downside * 252.0_f64.sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn build_result_returns_and_dates() {
        let series = make_series(&[100.0, 105.0, 110.0]);
        let portfolio = make_portfolio(&[10_000.0, 10_500.0, 11_000.0], vec![]);
        let result = BacktestResult::build("Test", &series, &portfolio);

        assert_eq!(result.strategy, "Test");
        assert_eq!(result.ticker, "TEST");
        assert_eq!(result.start_date, day(0));
        assert_eq!(result.end_date, day(2));
        assert_eq!(result.dates.len(), 3);
        assert_relative_eq!(result.final_value, 11_000.0);
        assert_relative_eq!(result.total_return_pct, 10.0, epsilon = 1e-9);
        assert_relative_eq!(result.buy_and_hold_return_pct, 10.0, epsilon = 1e-9);
        let expected = (1.1_f64.powf(365.0 / 2.0) - 1.0) * 100.0;
        assert_relative_eq!(result.annualized_return_pct, expected, max_relative = 1e-9);
        assert_eq!(result.max_drawdown_pct, 0.0);
        assert_eq!(result.total_trades, 0);
    }

    #[test]
    fn single_bar_uses_one_day_span() {
        let series = make_series(&[100.0]);
        let portfolio = make_portfolio(&[10_000.0], vec![]);
        let result = BacktestResult::build("Test", &series, &portfolio);
        assert_eq!(result.annualized_return_pct, 0.0);
        assert_eq!(result.sharpe, 0.0);
    }

    #[test]
    fn win_loss_counts_sum_to_total() {
        let trades = vec![
            trade(0, "TEST", TradeAction::Buy, 100.0),
            trade(1, "TEST", TradeAction::Sell, 90.0),
            trade(1, "TEST", TradeAction::Buy, 90.0),
            trade(2, "TEST", TradeAction::Sell, 95.0),
            trade(2, "TEST", TradeAction::Buy, 95.0),
        ];
        let series = make_series(&[100.0, 90.0, 95.0]);
        let portfolio = make_portfolio(&[10_000.0, 9_000.0, 9_500.0], trades);
        let result = BacktestResult::build("Test", &series, &portfolio);
        assert_eq!(result.total_trades, 2);
        assert_eq!(result.winning_trades + result.losing_trades, result.total_trades);
        assert_eq!(result.trades.len(), 5);
    }
}
