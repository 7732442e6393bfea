mod index;
mod interval;
mod price_bar;
mod trigger;
pub mod indicators;

pub use index::{IndexUniverse, MarketIndex};
pub use interval::Interval;
pub use price_bar::PriceBar;
pub use trigger::{Diagnostic, SkipReason, TriggerEvent};

use std::collections::HashMap;

/// Time series data for a single ticker
pub type TimeSeries = Vec<PriceBar>;

/// Market data collection (ticker -> time series)
pub type MarketData = HashMap<String, TimeSeries>;
