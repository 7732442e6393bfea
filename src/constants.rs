//! Screening Constants
//!
//! Fixed parameters of the two-stage screen: the daily Awesome Oscillator
//! filter and the hourly EMA20 cross-up trigger.

/// Lookback window in trading days, used for both the daily and hourly fetch
pub const DAYS_LOOKBACK: u32 = 60;

/// Maximum number of symbols per provider request
pub const BATCH_SIZE: usize = 10;

/// Short SMA period of the Awesome Oscillator
pub const AO_SHORT_PERIOD: usize = 5;

/// Long SMA period of the Awesome Oscillator
pub const AO_LONG_PERIOD: usize = 34;

/// EMA span for the hourly trigger line
pub const EMA_SPAN: usize = 20;

/// Minimum hourly observations required to scan a ticker
///
/// One warm-up span plus one bar, so a previous-EMA exists at the first
/// position a crossing could be evaluated.
pub const MIN_HOURLY_OBSERVATIONS: usize = EMA_SPAN + 1;

/// Number of most recent dates shown in the AO<0 summary
pub const SUMMARY_DAYS: usize = 20;

/// Decimal places for trigger prices
pub const PRICE_DECIMALS: u32 = 4;

/// Cache TTL constants (seconds), one tier per operation
pub const NAME_CACHE_TTL_SECONDS: i64 = 86_400; // 24h for display names
pub const DAILY_AO_CACHE_TTL_SECONDS: i64 = 3_600; // 1h for daily AO tables
pub const TRIGGER_CACHE_TTL_SECONDS: i64 = 1_800; // 30min for hourly trigger results
