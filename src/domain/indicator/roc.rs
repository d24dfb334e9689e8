//! ROC (Rate of Change) indicator implementation.
//!
//! ROC(n)[i] = ((C[i] - C[i-n]) / C[i-n]) * 100
//! If C[i-n] == 0 the value is undefined.
//! Warmup: first n bars undefined.

use crate::domain::indicator_helpers::undefined_column;
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_roc(bars: &[OhlcvBar], period: usize) -> Vec<f64> {
    let mut values = undefined_column(bars.len());
    if period == 0 {
        return values;
    }

    for i in period..bars.len() {
        let prev_close = bars[i - period].close;
        if prev_close != 0.0 {
            values[i] = ((bars[i].close - prev_close) / prev_close) * 100.0;
        }
    }
    values
}
