//! Shared helpers for indicator calculations.
//!
//! Every helper returns a column aligned with its input. Undefined entries are
//! `f64::NAN`; a NaN inside a window makes that window's output NaN too.

/// A column of `len` undefined values.
pub fn undefined_column(len: usize) -> Vec<f64> {
    vec![f64::NAN; len]
}

/// Trailing arithmetic mean over `period` values.
pub fn rolling_mean(values: &[f64], period: usize) -> Vec<f64> {
    let mut out = undefined_column(values.len());
    if period == 0 {
        return out;
    }
    for i in (period - 1)..values.len() {
        let window = &values[i + 1 - period..=i];
        out[i] = window.iter().sum::<f64>() / period as f64;
    }
    out
}

/// Recursive exponential average with smoothing factor `alpha`.
///
/// Seeded with the first defined input, so output is defined from there on.
pub fn exponential_smooth(values: &[f64], alpha: f64) -> Vec<f64> {
    let mut out = undefined_column(values.len());
    let mut prev: Option<f64> = None;

    for (i, &v) in values.iter().enumerate() {
        let next = match prev {
            None if v.is_nan() => continue,
            None => v,
            Some(p) => alpha * v + (1.0 - alpha) * p,
        };
        out[i] = next;
        prev = Some(next);
    }
    out
}

/// Wilder smoothing (alpha = 1/period) of `values[start..]`.
///
/// The seed is the simple mean of the first `period` values from `start`, placed
/// at `start + period - 1`; each later value is `(prev * (period-1) + x) / period`.
pub fn wilder_smooth(values: &[f64], period: usize, start: usize) -> Vec<f64> {
    let mut out = undefined_column(values.len());
    if period == 0 || start + period > values.len() {
        return out;
    }

    let seed_end = start + period - 1;
    let mut avg = values[start..=seed_end].iter().sum::<f64>() / period as f64;
    out[seed_end] = avg;

    for i in (seed_end + 1)..values.len() {
        avg = (avg * (period - 1) as f64 + values[i]) / period as f64;
        out[i] = avg;
    }
    out
}

/// Highest value over the trailing `period` window ending at `end`.
pub fn window_max(values: &[f64], end: usize, period: usize) -> f64 {
    values[end + 1 - period..=end]
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max)
}

/// Lowest value over the trailing `period` window ending at `end`.
pub fn window_min(values: &[f64], end: usize, period: usize) -> f64 {
    values[end + 1 - period..=end]
        .iter()
        .copied()
        .fold(f64::INFINITY, f64::min)
}
