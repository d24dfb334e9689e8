//! Money Flow Index.
//!
//! Raw money flow = TP × Volume. A bar's flow is positive when TP rose versus
//! the prior bar and negative when it fell. Positive and negative flows are
//! Wilder-smoothed like RSI gains and losses:
//! MFI = 100 - 100 / (1 + avg_positive / avg_negative), saturating at 100 when
//! the negative average is zero. Warmup: first n bars undefined.

use crate::domain::indicator::rsi::ratio_index;
use crate::domain::indicator_helpers::{undefined_column, wilder_smooth};
use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_PERIOD: usize = 14;

pub fn calculate_mfi(bars: &[OhlcvBar], period: usize) -> Vec<f64> {
    if bars.len() < 2 {
        return undefined_column(bars.len());
    }

    let typical: Vec<f64> = bars.iter().map(|b| b.typical_price()).collect();
    let mut positive = undefined_column(bars.len());
    let mut negative = undefined_column(bars.len());
    for i in 1..bars.len() {
        let flow = typical[i] * bars[i].volume;
        positive[i] = if typical[i] > typical[i - 1] { flow } else { 0.0 };
        negative[i] = if typical[i] < typical[i - 1] { flow } else { 0.0 };
    }

    let avg_positive = wilder_smooth(&positive, period, 1);
    let avg_negative = wilder_smooth(&negative, period, 1);

    avg_positive
        .iter()
        .zip(&avg_negative)
        .map(|(&p, &n)| ratio_index(p, n))
        .collect()
}
