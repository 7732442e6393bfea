//! Batched price-history retrieval
//!
//! The provider caps request size, so symbol lists are split into chunks of
//! `BATCH_SIZE` and fetched sequentially. Batches are independent: a failed
//! batch contributes diagnostics for its symbols and the remaining batches
//! still run. Only when every batch of a non-empty request fails does the
//! fetch surface a fatal error (total data-source failure). No retry.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::constants::BATCH_SIZE;
use crate::error::{AppError, Result};
use crate::models::{Diagnostic, Interval, MarketData};
use crate::services::provider::ProviderError;

/// Price-history source consumed one batch at a time
///
/// Implementations return the normalized ticker -> series mapping for one or
/// many symbols; unknown symbols are simply absent from the result.
pub trait HistorySource {
    fn fetch(
        &self,
        symbols: &[String],
        lookback_days: u32,
        interval: Interval,
    ) -> impl std::future::Future<Output = std::result::Result<MarketData, ProviderError>>;
}

pub struct BatchFetcher<S> {
    source: Arc<S>,
}

impl<S: HistorySource> BatchFetcher<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }

    /// Fetch history for all symbols in bounded batches
    ///
    /// Returns the merged market data plus one diagnostic per symbol that is
    /// missing from it, whether because its batch failed or because the
    /// provider had nothing for it.
    pub async fn fetch(
        &self,
        symbols: &[String],
        lookback_days: u32,
        interval: Interval,
    ) -> Result<(MarketData, Vec<Diagnostic>)> {
        let mut merged = MarketData::new();
        let mut diagnostics = Vec::new();

        if symbols.is_empty() {
            return Ok((merged, diagnostics));
        }

        let batch_count = symbols.len().div_ceil(BATCH_SIZE);
        let mut failed_batches = 0usize;

        for (batch_index, batch) in symbols.chunks(BATCH_SIZE).enumerate() {
            debug!(
                batch = batch_index + 1,
                of = batch_count,
                symbols = batch.len(),
                interval = %interval,
                "fetching batch"
            );

            match self.source.fetch(batch, lookback_days, interval).await {
                Ok(mut data) => {
                    for symbol in batch {
                        match data.remove(symbol) {
                            Some(bars) => {
                                merged.insert(symbol.clone(), bars);
                            }
                            None => {
                                diagnostics.push(Diagnostic::missing_data(symbol.clone()));
                            }
                        }
                    }
                }
                Err(e) => {
                    warn!(
                        batch = batch_index + 1,
                        of = batch_count,
                        error = %e,
                        "batch fetch failed, continuing with remaining batches"
                    );
                    failed_batches += 1;
                    diagnostics.extend(batch.iter().map(|s| Diagnostic::missing_data(s.clone())));
                }
            }
        }

        if failed_batches == batch_count {
            return Err(AppError::DataUnavailable(format!(
                "all {} batches failed for {} symbols ({})",
                batch_count,
                symbols.len(),
                interval
            )));
        }

        Ok((merged, diagnostics))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PriceBar;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn bar(day: u32) -> PriceBar {
        let time = NaiveDate::from_ymd_opt(2025, 6, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        PriceBar::new(time, 1.0, 2.0, 0.5, 1.5, 100)
    }

    /// Source that records batch calls and fails programmed batch indices
    struct ScriptedSource {
        calls: AtomicUsize,
        batches_seen: Mutex<Vec<Vec<String>>>,
        fail_batches: Vec<usize>,
        omit_symbols: Vec<String>,
    }

    impl ScriptedSource {
        fn new(fail_batches: Vec<usize>, omit_symbols: Vec<String>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                batches_seen: Mutex::new(Vec::new()),
                fail_batches,
                omit_symbols,
            }
        }
    }

    impl HistorySource for ScriptedSource {
        async fn fetch(
            &self,
            symbols: &[String],
            _lookback_days: u32,
            _interval: Interval,
        ) -> std::result::Result<MarketData, ProviderError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            self.batches_seen.lock().unwrap().push(symbols.to_vec());

            if self.fail_batches.contains(&call) {
                return Err(ProviderError::InvalidResponse("scripted failure".to_string()));
            }

            let mut data = MarketData::new();
            for symbol in symbols {
                if !self.omit_symbols.contains(symbol) {
                    data.insert(symbol.clone(), vec![bar(2), bar(3)]);
                }
            }
            Ok(data)
        }
    }

    fn symbols(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("SYM{:02}", i)).collect()
    }

    #[tokio::test]
    async fn test_batch_count_is_ceil_n_over_10() {
        let source = Arc::new(ScriptedSource::new(vec![], vec![]));
        let fetcher = BatchFetcher::new(source.clone());

        let (data, diagnostics) = fetcher
            .fetch(&symbols(25), 60, Interval::Daily)
            .await
            .unwrap();

        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
        assert_eq!(data.len(), 25);
        assert!(diagnostics.is_empty());

        let seen = source.batches_seen.lock().unwrap();
        assert_eq!(seen[0].len(), 10);
        assert_eq!(seen[1].len(), 10);
        assert_eq!(seen[2].len(), 5);
    }

    #[tokio::test]
    async fn test_failed_batch_does_not_affect_others() {
        // Second batch (index 1) fails
        let source = Arc::new(ScriptedSource::new(vec![1], vec![]));
        let fetcher = BatchFetcher::new(source);

        let all = symbols(25);
        let (data, diagnostics) = fetcher.fetch(&all, 60, Interval::Hourly).await.unwrap();

        assert_eq!(data.len(), 15);
        assert_eq!(diagnostics.len(), 10);
        for symbol in &all[..10] {
            assert!(data.contains_key(symbol));
        }
        for symbol in &all[10..20] {
            assert!(!data.contains_key(symbol));
            assert!(diagnostics.iter().any(|d| &d.ticker == symbol));
        }
        for symbol in &all[20..] {
            assert!(data.contains_key(symbol));
        }
    }

    #[tokio::test]
    async fn test_all_batches_failed_is_fatal() {
        let source = Arc::new(ScriptedSource::new(vec![0, 1, 2], vec![]));
        let fetcher = BatchFetcher::new(source);

        let result = fetcher.fetch(&symbols(25), 60, Interval::Daily).await;
        assert!(matches!(result, Err(AppError::DataUnavailable(_))));
    }

    #[tokio::test]
    async fn test_missing_symbol_gets_diagnostic() {
        let source = Arc::new(ScriptedSource::new(vec![], vec!["SYM03".to_string()]));
        let fetcher = BatchFetcher::new(source);

        let (data, diagnostics) = fetcher
            .fetch(&symbols(5), 60, Interval::Daily)
            .await
            .unwrap();

        assert_eq!(data.len(), 4);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].ticker, "SYM03");
    }

    #[tokio::test]
    async fn test_empty_symbol_list() {
        let source = Arc::new(ScriptedSource::new(vec![], vec![]));
        let fetcher = BatchFetcher::new(source.clone());

        let (data, diagnostics) = fetcher.fetch(&[], 60, Interval::Daily).await.unwrap();
        assert!(data.is_empty());
        assert!(diagnostics.is_empty());
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }
}
