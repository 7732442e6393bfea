use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An hourly EMA20 cross-up that passed the daily AO<0 date-join
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerEvent {
    /// Calendar date of the crossing bar
    pub date: NaiveDate,

    /// Time of day of the crossing bar (exchange-local)
    pub time: NaiveTime,

    /// Ticker symbol
    pub ticker: String,

    /// Close of the crossing bar, rounded for display
    pub price: f64,
}

impl TriggerEvent {
    /// Sort key for presentation order
    pub fn sort_key(&self) -> (NaiveDate, NaiveTime, String) {
        (self.date, self.time, self.ticker.clone())
    }
}

/// Why a ticker was skipped during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Ticker absent from the fetch result (unknown symbol, delisted, batch failure)
    MissingData,
    /// Series too short to compute the indicator
    ShortSeries { observations: usize, required: usize },
}

/// Structured per-ticker diagnostic returned alongside computed results
///
/// Computation never prints; the presentation layer decides what to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub ticker: String,
    pub reason: SkipReason,
}

impl Diagnostic {
    pub fn missing_data(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            reason: SkipReason::MissingData,
        }
    }

    pub fn short_series(ticker: impl Into<String>, observations: usize, required: usize) -> Self {
        Self {
            ticker: ticker.into(),
            reason: SkipReason::ShortSeries {
                observations,
                required,
            },
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            SkipReason::MissingData => write!(f, "{}: no data returned, skipping", self.ticker),
            SkipReason::ShortSeries {
                observations,
                required,
            } => write!(
                f,
                "{}: only {} observations (need {}), skipping",
                self.ticker, observations, required
            ),
        }
    }
}
