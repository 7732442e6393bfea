use serde::{Deserialize, Serialize};
use std::fmt;

/// Bar interval for price history requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    /// Daily candles
    Daily,
    /// 1-hour candles
    Hourly,
}

impl Interval {
    /// Convert to the provider's interval string
    pub fn to_provider_format(&self) -> &'static str {
        match self {
            Interval::Daily => "1d",
            Interval::Hourly => "1h",
        }
    }

    /// Short label used in logs and cache keys
    pub fn label(&self) -> &'static str {
        match self {
            Interval::Daily => "1D",
            Interval::Hourly => "1H",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Default for Interval {
    fn default() -> Self {
        Interval::Daily
    }
}
