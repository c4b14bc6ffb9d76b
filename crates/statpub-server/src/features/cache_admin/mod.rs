//! Operational access to the response cache.

pub mod commands;
pub mod queries;
pub mod routes;

pub use commands::{ClearCacheCommand, ClearCacheError, ClearCacheResponse};
pub use queries::CacheStatsQuery;
pub use routes::cache_routes;
