pub mod cache;
pub mod fetcher;
pub mod names;
pub mod provider;
pub mod screener;

pub use cache::{CacheKey, Clock, SystemClock, TtlCache};
pub use fetcher::{BatchFetcher, HistorySource};
pub use names::{NameResolver, NameSource};
pub use provider::{ProviderError, YahooFinanceClient};
pub use screener::{ScanReport, Screener};
