//! Technical indicators for the two-stage screen
//!
//! All functions operate on ordered numeric series for a single ticker and
//! return vectors aligned with the input. Positions inside an indicator's
//! warm-up window are `None`, never zero: a missing value must not be
//! confused with a zero reading when joining against other series.

use crate::models::PriceBar;

/// Median price series, (high + low) / 2 per bar
pub fn median_price(bars: &[PriceBar]) -> Vec<f64> {
    bars.iter().map(|bar| bar.median()).collect()
}

/// Closing price series
pub fn closes(bars: &[PriceBar]) -> Vec<f64> {
    bars.iter().map(|bar| bar.close).collect()
}

/// Simple Moving Average over a rolling window
///
/// Defined at position i only once `window` observations exist
/// (i >= window - 1). No partial-window averaging, no forward fill.
pub fn sma(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; values.len()];

    if window == 0 || values.len() < window {
        return result;
    }

    let mut sum: f64 = values[..window].iter().sum();
    result[window - 1] = Some(sum / window as f64);

    for i in window..values.len() {
        sum = sum - values[i - window] + values[i];
        result[i] = Some(sum / window as f64);
    }

    result
}

/// Awesome Oscillator: SMA5(median) - SMA34(median)
///
/// Undefined until both windows are warm, i.e. before the 34th observation.
pub fn awesome_oscillator(median: &[f64]) -> Vec<Option<f64>> {
    use crate::constants::{AO_LONG_PERIOD, AO_SHORT_PERIOD};

    let short = sma(median, AO_SHORT_PERIOD);
    let long = sma(median, AO_LONG_PERIOD);

    short
        .iter()
        .zip(long.iter())
        .map(|(s, l)| match (s, l) {
            (Some(s), Some(l)) => Some(s - l),
            _ => None,
        })
        .collect()
}

/// Exponential Moving Average, non-adjusted recursion
///
/// alpha = 2 / (span + 1); EMA[0] = values[0];
/// EMA[i] = alpha * values[i] + (1 - alpha) * EMA[i-1].
///
/// No SMA seeding and no bias-correction reweighting of early terms.
/// Cross detection is sensitive to EMA lag, so this recursion must not be
/// swapped for a seeded variant.
pub fn ema(values: &[f64], span: usize) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut result = Vec::with_capacity(values.len());
    let mut previous = values[0];
    result.push(previous);

    for &value in &values[1..] {
        previous = alpha * value + (1.0 - alpha) * previous;
        result.push(previous);
    }

    result
}

/// Positions where price crosses up through a reference line
///
/// A crossing fires at i iff prices[i-1] < line[i-1] AND prices[i] > line[i],
/// strict on both sides. Never fires at i = 0 and never on equality.
pub fn cross_ups(prices: &[f64], line: &[f64]) -> Vec<usize> {
    let len = prices.len().min(line.len());
    let mut positions = Vec::new();

    for i in 1..len {
        if prices[i - 1] < line[i - 1] && prices[i] > line[i] {
            positions.push(i);
        }
    }

    positions
}
