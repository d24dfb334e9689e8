//! Plain-text report adapter implementing ReportPort.
//!
//! Renders a summary block, monthly returns and an optional trade log for a
//! single run, and a one-line-per-strategy table for comparisons.

use chrono::Datelike;
use std::collections::BTreeMap;
use std::fmt::Write;

use crate::domain::error::StratbenchError;
use crate::domain::metrics::BacktestResult;
use crate::domain::portfolio::EquityPoint;
use crate::ports::report_port::ReportPort;

#[derive(Debug, Clone, Copy, Default)]
pub struct TextReport {
    pub include_trades: bool,
}

impl TextReport {
    pub fn new(include_trades: bool) -> Self {
        TextReport { include_trades }
    }
}

pub struct MonthlyReturn {
    pub year: i32,
    pub month: u32,
    pub return_pct: f64,
}

/// Month-over-month change of the last equity sample in each month.
///
/// The first month is measured against the first sample.
pub fn compute_monthly_returns(equity_curve: &[EquityPoint]) -> Vec<MonthlyReturn> {
    let Some(first) = equity_curve.first() else {
        return Vec::new();
    };

    let mut month_end: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    for point in equity_curve {
        month_end.insert((point.date.year(), point.date.month()), point.equity);
    }

    let mut prev = first.equity;
    month_end
        .into_iter()
        .map(|((year, month), end)| {
            let return_pct = if prev > 0.0 {
                (end - prev) / prev * 100.0
            } else {
                0.0
            };
            prev = end;
            MonthlyReturn {
                year,
                month,
                return_pct,
            }
        })
        .collect()
}

fn format_ratio(value: f64) -> String {
    if value.is_infinite() {
        "inf".to_string()
    } else {
        format!("{:.2}", value)
    }
}

fn write_summary(out: &mut String, r: &BacktestResult) -> std::fmt::Result {
    writeln!(out, "=== {} on {} ===", r.strategy, r.ticker)?;
    writeln!(
        out,
        "Period:           {} to {} ({} bars)",
        r.start_date,
        r.end_date,
        r.dates.len()
    )?;
    writeln!(out, "Initial Cash:     {:.2}", r.initial_cash)?;
    writeln!(out, "Final Value:      {:.2}", r.final_value)?;
    writeln!(out, "Total Return:     {:.2}%", r.total_return_pct)?;
    writeln!(out, "Buy & Hold:       {:.2}%", r.buy_and_hold_return_pct)?;
    writeln!(out, "Annualized:       {:.2}%", r.annualized_return_pct)?;
    writeln!(
        out,
        "Max Drawdown:     -{:.2}% ({} bars)",
        r.max_drawdown_pct, r.max_drawdown_duration
    )?;
    writeln!(out, "Sharpe Ratio:     {:.2}", r.sharpe)?;
    writeln!(out, "Sortino Ratio:    {:.2}", r.sortino)?;
    writeln!(
        out,
        "Total Trades:     {} ({} won, {} lost)",
        r.total_trades, r.winning_trades, r.losing_trades
    )?;
    writeln!(out, "Win Rate:         {:.1}%", r.win_rate_pct)?;
    writeln!(out, "Avg Win / Loss:   {:.2}% / {:.2}%", r.avg_win_pct, r.avg_loss_pct)?;
    writeln!(
        out,
        "Largest Win/Loss: {:.2}% / {:.2}%",
        r.largest_win_pct, r.largest_loss_pct
    )?;
    writeln!(out, "Profit Factor:    {}", format_ratio(r.profit_factor))?;
    writeln!(out, "Avg Holding:      {:.1} days", r.avg_holding_days)
}

fn write_monthly_returns(out: &mut String, r: &BacktestResult) -> std::fmt::Result {
    let returns = compute_monthly_returns(&r.equity_curve);
    if returns.is_empty() {
        return Ok(());
    }
    writeln!(out, "\nMonthly Returns:")?;
    for m in &returns {
        writeln!(out, "  {}-{:02}  {:>8.2}%", m.year, m.month, m.return_pct)?;
    }
    Ok(())
}

fn write_trade_log(out: &mut String, r: &BacktestResult) -> std::fmt::Result {
    writeln!(out, "\nTrade Log:")?;
    if r.trades.is_empty() {
        return writeln!(out, "  (no trades)");
    }
    writeln!(
        out,
        "  {:<10}  {:<4}  {:>8}  {:>10}  {:>12}  {:>8}",
        "Date", "Side", "Shares", "Price", "Value", "Comm."
    )?;
    for t in &r.trades {
        writeln!(
            out,
            "  {:<10}  {:<4}  {:>8}  {:>10.2}  {:>12.2}  {:>8.2}",
            t.date, t.action, t.shares, t.price, t.value, t.commission
        )?;
    }
    Ok(())
}

fn report_error(e: std::fmt::Error) -> StratbenchError {
    StratbenchError::Report {
        reason: e.to_string(),
    }
}

impl ReportPort for TextReport {
    fn render(&self, result: &BacktestResult) -> Result<String, StratbenchError> {
        let mut out = String::new();
        write_summary(&mut out, result).map_err(report_error)?;
        write_monthly_returns(&mut out, result).map_err(report_error)?;
        if self.include_trades {
            write_trade_log(&mut out, result).map_err(report_error)?;
        }
        Ok(out)
    }

    fn render_comparison(&self, results: &[BacktestResult]) -> Result<String, StratbenchError> {
        let mut out = String::new();
        let write_table = |out: &mut String| -> std::fmt::Result {
            if let Some(first) = results.first() {
                writeln!(
                    out,
                    "=== Strategy comparison: {} ({} to {}) ===",
                    first.ticker, first.start_date, first.end_date
                )?;
                writeln!(out, "Buy & Hold: {:.2}%", first.buy_and_hold_return_pct)?;
            }
            writeln!(
                out,
                "{:<28} {:>10} {:>10} {:>8} {:>8} {:>7} {:>8} {:>7}",
                "Strategy", "Return%", "MaxDD%", "Sharpe", "Sortino", "Trades", "WinRate%", "PF"
            )?;
            for r in results {
                writeln!(
                    out,
                    "{:<28} {:>10.2} {:>10.2} {:>8.2} {:>8.2} {:>7} {:>8.1} {:>7}",
                    r.strategy,
                    r.total_return_pct,
                    r.max_drawdown_pct,
                    r.sharpe,
                    r.sortino,
                    r.total_trades,
                    r.win_rate_pct,
                    format_ratio(r.profit_factor)
                )?;
            }
            Ok(())
        };
        write_table(&mut out).map_err(report_error)?;
        Ok(out)
    }
}
