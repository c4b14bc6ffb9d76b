pub mod stats;

pub use stats::CacheStatsQuery;
