//! Screening pipeline orchestration
//!
//! Wires the batch fetcher, indicator stages, caches, and name resolver into
//! the two entry points the CLI consumes: `scan` for one index and `summary`
//! across a universe. Runs are sequential; nothing here retries or
//! parallelizes fetches.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use crate::analysis::{build_daily_ao, filter_ao_negative, find_triggers, AoSummary, DailyAoTable, IndexAo};
use crate::constants::{DAILY_AO_CACHE_TTL_SECONDS, DAYS_LOOKBACK, TRIGGER_CACHE_TTL_SECONDS};
use crate::error::Result;
use crate::models::{Diagnostic, IndexUniverse, Interval, MarketIndex, TriggerEvent};
use crate::services::cache::{CacheKey, Clock, SystemClock, TtlCache};
use crate::services::fetcher::{BatchFetcher, HistorySource};
use crate::services::names::{NameResolver, NameSource};

/// Result of scanning one index
pub struct ScanReport {
    pub index: String,
    pub member_count: usize,
    /// Tickers whose latest daily AO is strictly negative, in index order
    pub negative: Vec<String>,
    /// Date-validated cross-ups, sorted by (date, time, ticker)
    pub triggers: Vec<TriggerEvent>,
    /// Display names for tickers appearing in `triggers`
    pub names: HashMap<String, String>,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct Screener<S> {
    fetcher: BatchFetcher<S>,
    resolver: NameResolver<S>,
    daily_cache: TtlCache<DailyAoTable>,
    trigger_cache: TtlCache<Vec<TriggerEvent>>,
}

impl<S: HistorySource + NameSource> Screener<S> {
    pub fn new(source: S) -> Self {
        Self::with_clock(source, Arc::new(SystemClock))
    }

    /// Build a screener with an injected clock for the cache tiers
    pub fn with_clock(source: S, clock: Arc<dyn Clock>) -> Self {
        let source = Arc::new(source);
        Self {
            fetcher: BatchFetcher::new(source.clone()),
            resolver: NameResolver::new(source, clock.clone()),
            daily_cache: TtlCache::new(DAILY_AO_CACHE_TTL_SECONDS, clock.clone()),
            trigger_cache: TtlCache::new(TRIGGER_CACHE_TTL_SECONDS, clock),
        }
    }

    /// Daily AO table for a ticker set, through the 1h cache tier
    async fn daily_ao_table(&self, tickers: &[String]) -> Result<(DailyAoTable, Vec<Diagnostic>)> {
        let key = CacheKey::new("daily_ao", tickers, DAYS_LOOKBACK, Some(Interval::Daily));

        if let Some(table) = self.daily_cache.get(&key) {
            info!(tickers = tickers.len(), "daily AO table served from cache");
            return Ok((table, Vec::new()));
        }

        let (data, diagnostics) = self
            .fetcher
            .fetch(tickers, DAYS_LOOKBACK, Interval::Daily)
            .await?;
        let table = build_daily_ao(&data);
        self.daily_cache.insert(key, table.clone());

        Ok((table, diagnostics))
    }

    /// Hourly trigger scan for an AO-negative subset, through the 30min tier
    async fn hourly_triggers(
        &self,
        negative: &[String],
        daily_ao: &DailyAoTable,
    ) -> Result<(Vec<TriggerEvent>, Vec<Diagnostic>)> {
        let key = CacheKey::new("h1_triggers", negative, DAYS_LOOKBACK, Some(Interval::Hourly));

        if let Some(triggers) = self.trigger_cache.get(&key) {
            info!(tickers = negative.len(), "trigger scan served from cache");
            return Ok((triggers, Vec::new()));
        }

        let (data, mut diagnostics) = self
            .fetcher
            .fetch(negative, DAYS_LOOKBACK, Interval::Hourly)
            .await?;
        let (triggers, scan_diagnostics) = find_triggers(&data, daily_ao);
        diagnostics.extend(scan_diagnostics);
        self.trigger_cache.insert(key, triggers.clone());

        Ok((triggers, diagnostics))
    }

    /// Run the full two-stage screen for one index
    pub async fn scan(&self, index: &MarketIndex) -> Result<ScanReport> {
        info!(index = index.name.as_str(), members = index.tickers.len(), "starting scan");

        let (daily_ao, mut diagnostics) = self.daily_ao_table(&index.tickers).await?;
        let negative = filter_ao_negative(&daily_ao, &index.tickers);

        info!(
            negative = negative.len(),
            of = index.tickers.len(),
            "daily AO filter complete"
        );

        let (triggers, trigger_diagnostics) = self.hourly_triggers(&negative, &daily_ao).await?;
        diagnostics.extend(trigger_diagnostics);

        let mut trigger_tickers: Vec<String> =
            triggers.iter().map(|event| event.ticker.clone()).collect();
        trigger_tickers.sort();
        trigger_tickers.dedup();
        let names = self.resolver.resolve_all(&trigger_tickers).await;

        Ok(ScanReport {
            index: index.name.clone(),
            member_count: index.tickers.len(),
            negative,
            triggers,
            names,
            diagnostics,
        })
    }

    /// AO<0 counts per index for the most recent dates
    pub async fn summary(&self, universe: &IndexUniverse) -> Result<(AoSummary, Vec<Diagnostic>)> {
        let mut per_index = Vec::with_capacity(universe.index_count());
        let mut diagnostics = Vec::new();

        for index in &universe.indices {
            let (table, index_diagnostics) = self.daily_ao_table(&index.tickers).await?;
            diagnostics.extend(index_diagnostics);
            per_index.push(IndexAo {
                name: index.name.clone(),
                table,
                members: index.tickers.clone(),
            });
        }

        Ok((AoSummary::build(&per_index), diagnostics))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MarketData, PriceBar};
    use crate::services::provider::ProviderError;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Daily bars whose median follows `level(i)`, plus hourly bars with one
    /// cross-up on the final day, per scripted ticker
    struct ScriptedMarket {
        daily: Mutex<MarketData>,
        hourly: Mutex<MarketData>,
        history_calls: Arc<AtomicUsize>,
    }

    fn daily_bars(days: u32, level: impl Fn(u32) -> f64) -> Vec<PriceBar> {
        (0..days)
            .map(|i| {
                let mid = level(i);
                let time = (NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
                    + chrono::Days::new(i as u64))
                .and_hms_opt(0, 0, 0)
                .unwrap();
                PriceBar::new(time, mid, mid + 1.0, mid - 1.0, mid, 1_000)
            })
            .collect()
    }

    /// 30 hourly bars inside the daily range (8 bars a day, ending on the
    /// last daily date), dipping then recovering at the last bar so exactly
    /// one cross-up fires on that date
    fn hourly_bars_with_cross(last_daily_date: NaiveDate) -> Vec<PriceBar> {
        (0..30usize)
            .map(|i| {
                let close = if i == 28 {
                    90.0
                } else if i == 29 {
                    110.0
                } else {
                    100.0
                };
                let days_back = 3 - (i / 8) as u64;
                let date = last_daily_date - chrono::Days::new(days_back);
                let time = date.and_hms_opt(9 + (i % 8) as u32, 30, 0).unwrap();
                PriceBar::new(time, close, close + 0.5, close - 0.5, close, 500)
            })
            .collect()
    }

    impl HistorySource for ScriptedMarket {
        async fn fetch(
            &self,
            symbols: &[String],
            _lookback_days: u32,
            interval: Interval,
        ) -> std::result::Result<MarketData, ProviderError> {
            self.history_calls.fetch_add(1, Ordering::SeqCst);
            let store = match interval {
                Interval::Daily => self.daily.lock().unwrap(),
                Interval::Hourly => self.hourly.lock().unwrap(),
            };
            let mut out = MarketData::new();
            for symbol in symbols {
                if let Some(bars) = store.get(symbol) {
                    out.insert(symbol.clone(), bars.clone());
                }
            }
            Ok(out)
        }
    }

    impl NameSource for ScriptedMarket {
        async fn display_name(&self, symbol: &str) -> std::result::Result<String, ProviderError> {
            match symbol {
                "FALL" => Ok("Falling Plc".to_string()),
                _ => Err(ProviderError::NoData(symbol.to_string())),
            }
        }
    }

    fn scripted_market() -> ScriptedMarket {
        let fall_daily = daily_bars(40, |i| 200.0 - i as f64);
        let rise_daily = daily_bars(40, |i| 100.0 + i as f64);
        let last_date = fall_daily.last().unwrap().time.date();

        let mut daily = MarketData::new();
        daily.insert("FALL".to_string(), fall_daily);
        daily.insert("RISE".to_string(), rise_daily);

        let mut hourly = MarketData::new();
        hourly.insert("FALL".to_string(), hourly_bars_with_cross(last_date));
        // RISE also has hourly data, but must never be scanned
        hourly.insert("RISE".to_string(), hourly_bars_with_cross(last_date));

        ScriptedMarket {
            daily: Mutex::new(daily),
            hourly: Mutex::new(hourly),
            history_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn index(tickers: &[&str]) -> MarketIndex {
        MarketIndex {
            name: "TEST".to_string(),
            tickers: tickers.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_scan_gates_on_latest_daily_ao() {
        let screener = Screener::new(scripted_market());
        let report = screener.scan(&index(&["FALL", "RISE"])).await.unwrap();

        // Only the AO-negative ticker reaches the hourly stage
        assert_eq!(report.negative, vec!["FALL".to_string()]);
        assert_eq!(report.triggers.len(), 1);
        assert_eq!(report.triggers[0].ticker, "FALL");
        assert!(report.triggers.iter().all(|event| event.ticker != "RISE"));
        assert_eq!(report.names["FALL"], "Falling Plc");
    }

    #[tokio::test]
    async fn test_scan_reports_missing_tickers() {
        let screener = Screener::new(scripted_market());
        let report = screener.scan(&index(&["FALL", "RISE", "GONE"])).await.unwrap();

        assert!(report
            .diagnostics
            .iter()
            .any(|d| d.ticker == "GONE"));
        assert_eq!(report.negative, vec!["FALL".to_string()]);
    }

    #[tokio::test]
    async fn test_repeat_scan_hits_cache() {
        let market = scripted_market();
        let calls = market.history_calls.clone();
        let screener = Screener::new(market);

        let first = screener.scan(&index(&["FALL", "RISE"])).await.unwrap();
        let after_first = calls.load(Ordering::SeqCst);
        let second = screener.scan(&index(&["FALL", "RISE"])).await.unwrap();

        assert_eq!(first.triggers, second.triggers);
        // 1 daily batch + 1 hourly batch; the repeat is fully cached
        assert_eq!(after_first, 2);
        assert_eq!(calls.load(Ordering::SeqCst), after_first);
        assert!(second.diagnostics.is_empty());
    }

    #[tokio::test]
    async fn test_summary_counts_negative_members() {
        let screener = Screener::new(scripted_market());
        let universe = IndexUniverse {
            indices: vec![index(&["FALL", "RISE"])],
        };

        let (summary, _) = screener.summary(&universe).await.unwrap();
        let last = *summary.dates().last().unwrap();
        assert_eq!(summary.count(last, "TEST"), Some(1));
    }
}
