pub mod daily;
pub mod hourly;
pub mod summary;

pub use daily::{build_daily_ao, filter_ao_negative, DailyAoTable};
pub use hourly::find_triggers;
pub use summary::{AoSummary, IndexAo};
