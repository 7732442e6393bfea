//! Daily Awesome Oscillator stage
//!
//! Builds the per-run AO table (calendar date -> ticker -> AO value) from
//! daily bars and derives the ticker subset whose most recent AO is strictly
//! negative. The table is keyed by date only, so intraday timestamps from the
//! hourly stage can join against it by calendar date.

use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

use crate::models::indicators::{awesome_oscillator, median_price};
use crate::models::MarketData;

/// AO values per (calendar date, ticker)
///
/// Only defined values appear: warm-up positions are absent, not zero.
#[derive(Debug, Clone, Default)]
pub struct DailyAoTable {
    rows: BTreeMap<NaiveDate, HashMap<String, f64>>,
}

impl DailyAoTable {
    pub fn insert(&mut self, date: NaiveDate, ticker: String, value: f64) {
        self.rows.entry(date).or_default().insert(ticker, value);
    }

    pub fn value(&self, date: NaiveDate, ticker: &str) -> Option<f64> {
        self.rows.get(&date)?.get(ticker).copied()
    }

    /// Strict `< 0`; absent values are never negative
    pub fn is_negative(&self, date: NaiveDate, ticker: &str) -> bool {
        matches!(self.value(date, ticker), Some(v) if v < 0.0)
    }

    /// Most recent date with any defined AO value
    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.rows.keys().next_back().copied()
    }

    /// All dates in ascending order
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.rows.keys().copied()
    }

    /// Count of `members` with AO < 0 on `date`; None when the table has no
    /// row for that date at all (index not trading that day)
    pub fn negative_count(&self, date: NaiveDate, members: &[String]) -> Option<usize> {
        let row = self.rows.get(&date)?;
        Some(
            members
                .iter()
                .filter(|ticker| matches!(row.get(ticker.as_str()), Some(v) if *v < 0.0))
                .count(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Compute the AO table for every ticker in the fetched daily data
///
/// Tickers whose series never reaches the long SMA window contribute nothing.
pub fn build_daily_ao(data: &MarketData) -> DailyAoTable {
    let mut table = DailyAoTable::default();

    for (ticker, bars) in data {
        let median = median_price(bars);
        let ao = awesome_oscillator(&median);

        for (bar, value) in bars.iter().zip(ao) {
            if let Some(value) = value {
                table.insert(bar.time.date(), ticker.clone(), value);
            }
        }
    }

    table
}

/// Tickers whose AO at the table's most recent date is strictly negative
///
/// Input order is preserved. Tickers absent from the table (fetch failure,
/// short history, no value on the latest date) are silently excluded.
pub fn filter_ao_negative(table: &DailyAoTable, tickers: &[String]) -> Vec<String> {
    let Some(latest) = table.latest_date() else {
        return Vec::new();
    };

    tickers
        .iter()
        .filter(|ticker| table.is_negative(latest, ticker))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PriceBar;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    /// Daily bars whose median follows `level(i)`
    fn bars_with_levels(days: u32, level: impl Fn(u32) -> f64) -> Vec<PriceBar> {
        (0..days)
            .map(|i| {
                let mid = level(i);
                let time = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap() + chrono::Days::new(i as u64);
                PriceBar::new(
                    time.and_hms_opt(0, 0, 0).unwrap(),
                    mid,
                    mid + 1.0,
                    mid - 1.0,
                    mid,
                    1_000,
                )
            })
            .collect()
    }

    #[test]
    fn test_build_daily_ao_keys_by_date() {
        let mut data = MarketData::new();
        // Falling series: SMA5 below SMA34 once warm, so AO < 0
        data.insert("FALL".to_string(), bars_with_levels(40, |i| 200.0 - i as f64));

        let table = build_daily_ao(&data);
        let latest = table.latest_date().unwrap();

        assert!(table.is_negative(latest, "FALL"));
        // Warm-up dates have no value
        assert_eq!(table.value(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(), "FALL"), None);
        // 40 bars, first 33 undefined
        assert_eq!(table.dates().count(), 7);
    }

    #[test]
    fn test_short_series_contributes_nothing() {
        let mut data = MarketData::new();
        data.insert("SHORT".to_string(), bars_with_levels(20, |i| 100.0 + i as f64));

        let table = build_daily_ao(&data);
        assert!(table.is_empty());
    }

    #[test]
    fn test_filter_keeps_only_latest_negative() {
        // A falling (AO negative), B rising (AO positive)
        let mut data = MarketData::new();
        data.insert("A".to_string(), bars_with_levels(40, |i| 200.0 - i as f64));
        data.insert("B".to_string(), bars_with_levels(40, |i| 100.0 + i as f64));

        let table = build_daily_ao(&data);
        let tickers = vec!["A".to_string(), "B".to_string(), "MISSING".to_string()];

        assert_eq!(filter_ao_negative(&table, &tickers), vec!["A".to_string()]);
    }

    #[test]
    fn test_filter_empty_table() {
        let table = DailyAoTable::default();
        assert!(filter_ao_negative(&table, &["A".to_string()]).is_empty());
    }

    #[test]
    fn test_is_negative_requires_strictness() {
        let mut table = DailyAoTable::default();
        table.insert(date(2), "ZERO".to_string(), 0.0);
        table.insert(date(2), "NEG".to_string(), -0.0001);

        assert!(!table.is_negative(date(2), "ZERO"));
        assert!(table.is_negative(date(2), "NEG"));
        assert!(!table.is_negative(date(2), "ABSENT"));
        assert!(!table.is_negative(date(3), "NEG"));
    }

    #[test]
    fn test_negative_count() {
        let mut table = DailyAoTable::default();
        table.insert(date(2), "A".to_string(), -1.0);
        table.insert(date(2), "B".to_string(), 2.0);
        table.insert(date(2), "C".to_string(), -0.5);

        let members = vec!["A".to_string(), "B".to_string(), "C".to_string(), "D".to_string()];
        assert_eq!(table.negative_count(date(2), &members), Some(2));
        assert_eq!(table.negative_count(date(3), &members), None);
    }
}
