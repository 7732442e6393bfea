//! Hourly EMA20 trigger stage
//!
//! Scans hourly closes for upward crossings of the EMA20 line and keeps a
//! crossing only when the daily AO for that ticker was strictly negative on
//! the crossing's own calendar date. The daily stage filters the candidate
//! set by the most recent AO; this stage re-validates per event, because the
//! AO sign can differ day to day inside the lookback window.

use tracing::warn;

use crate::constants::{EMA_SPAN, MIN_HOURLY_OBSERVATIONS};
use crate::models::indicators::{closes, cross_ups, ema};
use crate::models::{Diagnostic, MarketData, TriggerEvent};
use crate::utils::round_price;

use super::daily::DailyAoTable;

/// Detect date-validated EMA20 cross-ups across all fetched hourly series
///
/// Tickers with fewer than `MIN_HOURLY_OBSERVATIONS` bars are skipped with a
/// diagnostic. Events come back sorted by (date, time, ticker). Each (ticker,
/// hourly bar) can cross at most once, so no deduplication is needed.
pub fn find_triggers(
    hourly: &MarketData,
    daily_ao: &DailyAoTable,
) -> (Vec<TriggerEvent>, Vec<Diagnostic>) {
    let mut events = Vec::new();
    let mut diagnostics = Vec::new();

    // Deterministic scan order regardless of map iteration
    let mut tickers: Vec<&String> = hourly.keys().collect();
    tickers.sort();

    for ticker in tickers {
        let bars = &hourly[ticker];

        if bars.len() < MIN_HOURLY_OBSERVATIONS {
            warn!(
                ticker = ticker.as_str(),
                observations = bars.len(),
                required = MIN_HOURLY_OBSERVATIONS,
                "not enough hourly data, skipping"
            );
            diagnostics.push(Diagnostic::short_series(
                ticker.clone(),
                bars.len(),
                MIN_HOURLY_OBSERVATIONS,
            ));
            continue;
        }

        let prices = closes(bars);
        let line = ema(&prices, EMA_SPAN);

        for position in cross_ups(&prices, &line) {
            let timestamp = bars[position].time;
            let date = timestamp.date();

            if daily_ao.is_negative(date, ticker) {
                events.push(TriggerEvent {
                    date,
                    time: timestamp.time(),
                    ticker: ticker.clone(),
                    price: round_price(prices[position]),
                });
            }
        }
    }

    events.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    (events, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PriceBar, SkipReason};
    use chrono::NaiveDate;

    const DAY: u32 = 12;

    fn hourly_bars(count: usize, close_at: impl Fn(usize) -> f64) -> Vec<PriceBar> {
        (0..count)
            .map(|i| {
                let close = close_at(i);
                // 8 trading hours a day starting 09:00
                let day = DAY + (i / 8) as u32;
                let hour = 9 + (i % 8) as u32;
                let time = NaiveDate::from_ymd_opt(2025, 6, day)
                    .unwrap()
                    .and_hms_opt(hour, 30, 0)
                    .unwrap();
                PriceBar::new(time, close, close + 0.5, close - 0.5, close, 500)
            })
            .collect()
    }

    /// Flat series, one dip and sharp recovery near the end: exactly one
    /// cross-up at the recovery bar
    fn crossing_series(count: usize) -> (Vec<PriceBar>, usize) {
        let crossing_at = count - 1;
        let bars = hourly_bars(count, |i| {
            if i == crossing_at - 1 {
                90.0
            } else if i == crossing_at {
                110.0
            } else {
                100.0
            }
        });
        (bars, crossing_at)
    }

    fn negative_table_for(bars: &[PriceBar], ticker: &str) -> DailyAoTable {
        let mut table = DailyAoTable::default();
        for bar in bars {
            table.insert(bar.time.date(), ticker.to_string(), -0.5);
        }
        table
    }

    #[test]
    fn test_trigger_on_validated_date() {
        let (bars, crossing_at) = crossing_series(30);
        let table = negative_table_for(&bars, "A");

        let mut data = MarketData::new();
        data.insert("A".to_string(), bars.clone());

        let (events, diagnostics) = find_triggers(&data, &table);

        assert!(diagnostics.is_empty());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].ticker, "A");
        assert_eq!(events[0].date, bars[crossing_at].time.date());
        assert_eq!(events[0].time, bars[crossing_at].time.time());
        assert_eq!(events[0].price, 110.0);
    }

    #[test]
    fn test_trigger_excluded_when_ao_not_negative() {
        let (bars, _) = crossing_series(30);

        let mut data = MarketData::new();
        data.insert("A".to_string(), bars.clone());

        // Same crossing, AO non-negative on that date
        let mut positive = DailyAoTable::default();
        for bar in &bars {
            positive.insert(bar.time.date(), "A".to_string(), 0.2);
        }
        let (events, _) = find_triggers(&data, &positive);
        assert!(events.is_empty());

        // Same crossing, date absent from the table entirely
        let empty = DailyAoTable::default();
        let (events, _) = find_triggers(&data, &empty);
        assert!(events.is_empty());
    }

    #[test]
    fn test_short_series_skipped_with_diagnostic() {
        let (good_bars, _) = crossing_series(30);
        let short_bars = hourly_bars(15, |_| 100.0);

        let mut data = MarketData::new();
        data.insert("GOOD".to_string(), good_bars.clone());
        data.insert("C".to_string(), short_bars);

        let table = negative_table_for(&good_bars, "GOOD");
        let (events, diagnostics) = find_triggers(&data, &table);

        // C skipped, GOOD still processed
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].ticker, "C");
        assert_eq!(
            diagnostics[0].reason,
            SkipReason::ShortSeries {
                observations: 15,
                required: MIN_HOURLY_OBSERVATIONS
            }
        );
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].ticker, "GOOD");
    }

    #[test]
    fn test_events_sorted_by_date_time_ticker() {
        let (bars_b, _) = crossing_series(30);
        let (bars_a, _) = crossing_series(30);

        let mut data = MarketData::new();
        data.insert("B".to_string(), bars_b.clone());
        data.insert("A".to_string(), bars_a);

        let mut table = negative_table_for(&bars_b, "A");
        for bar in &bars_b {
            table.insert(bar.time.date(), "B".to_string(), -0.5);
        }

        let (events, _) = find_triggers(&data, &table);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].ticker, "A");
        assert_eq!(events[1].ticker, "B");
    }
}
