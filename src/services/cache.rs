//! TTL cache service
//!
//! An explicit, injected cache rather than process-global state. Each tier
//! (names, daily AO tables, hourly trigger results) is its own `TtlCache`
//! with its own time-to-live. Keys carry the full request scope (operation,
//! ticker set, lookback, interval) so differently-scoped requests never
//! collide. The clock is injected, so expiry is testable with a fixed clock.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::models::Interval;

/// Time source for cache expiry
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Full scope of a cached computation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub operation: &'static str,
    pub tickers: Vec<String>,
    pub lookback_days: u32,
    pub interval: Option<Interval>,
}

impl CacheKey {
    /// Build a key; the ticker set is sorted so ordering does not split entries
    pub fn new(
        operation: &'static str,
        tickers: &[String],
        lookback_days: u32,
        interval: Option<Interval>,
    ) -> Self {
        let mut tickers = tickers.to_vec();
        tickers.sort();
        Self {
            operation,
            tickers,
            lookback_days,
            interval,
        }
    }
}

#[derive(Clone, Debug)]
struct CacheEntry<V> {
    value: V,
    stored_at: DateTime<Utc>,
}

/// In-memory cache with a fixed time-to-live per instance
pub struct TtlCache<V: Clone> {
    entries: Mutex<HashMap<CacheKey, CacheEntry<V>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl_seconds: i64, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl: Duration::seconds(ttl_seconds),
            clock,
        }
    }

    /// Return the cached value if present and not expired
    pub fn get(&self, key: &CacheKey) -> Option<V> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let entry = entries.get(key)?;

        if self.clock.now() - entry.stored_at >= self.ttl {
            entries.remove(key);
            return None;
        }

        Some(entry.value.clone())
    }

    /// Store a value; an existing entry is overwritten (last writer wins)
    pub fn insert(&self, key: CacheKey, value: V) {
        let entry = CacheEntry {
            value,
            stored_at: self.clock.now(),
        };
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key, entry);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
