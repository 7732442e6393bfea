use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One OHLCV observation for a ticker
///
/// Timestamps are naive exchange-local time: the provider converts from UTC
/// to the exchange timezone and strips the zone annotation, so hourly and
/// daily series align by calendar date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceBar {
    /// Bar timestamp in exchange-local clock time
    pub time: NaiveDateTime,

    /// Opening price
    pub open: f64,

    /// Highest price
    pub high: f64,

    /// Lowest price
    pub low: f64,

    /// Closing price
    pub close: f64,

    /// Trading volume
    pub volume: u64,
}

impl PriceBar {
    /// Create a new price bar
    pub fn new(time: NaiveDateTime, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Median price of the bar, (high + low) / 2
    pub fn median(&self) -> f64 {
        (self.high + self.low) / 2.0
    }
}
