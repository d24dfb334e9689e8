//! JSON report adapter implementing ReportPort.
//!
//! Serializes `BacktestResult` as-is. Non-finite floats (an unbounded profit
//! factor) become `null`.

use crate::domain::error::StratbenchError;
use crate::domain::metrics::BacktestResult;
use crate::ports::report_port::ReportPort;

#[derive(Debug, Clone, Copy)]
pub struct JsonReport {
    pub pretty: bool,
}

impl Default for JsonReport {
    fn default() -> Self {
        JsonReport { pretty: true }
    }
}

impl JsonReport {
    fn to_json<T: serde::Serialize + ?Sized>(&self, value: &T) -> Result<String, StratbenchError> {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        json.map_err(|e| StratbenchError::Report {
            reason: format!("JSON serialization failed: {}", e),
        })
    }
}

impl ReportPort for JsonReport {
    fn render(&self, result: &BacktestResult) -> Result<String, StratbenchError> {
        self.to_json(result)
    }

    fn render_comparison(&self, results: &[BacktestResult]) -> Result<String, StratbenchError> {
        self.to_json(results)
    }
}
