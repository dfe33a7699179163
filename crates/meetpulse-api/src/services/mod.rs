//! Services backing the HTTP handlers.

pub mod stats_cache;
pub mod user_stats;

pub use stats_cache::StatsCache;
pub use user_stats::StatsService;
