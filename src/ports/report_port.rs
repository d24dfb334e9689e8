//! Report rendering port trait.

use crate::domain::error::StratbenchError;
use crate::domain::metrics::BacktestResult;

/// Turns finished results into a document. Renderers see only
/// `BacktestResult`, never portfolio or strategy internals.
pub trait ReportPort {
    fn render(&self, result: &BacktestResult) -> Result<String, StratbenchError>;

    /// Several runs over the same series, side by side.
    ///
    /// Default: each result rendered on its own, separated by a blank line.
    fn render_comparison(&self, results: &[BacktestResult]) -> Result<String, StratbenchError> {
        let parts = results
            .iter()
            .map(|r| self.render(r))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(parts.join("\n"))
    }
}
