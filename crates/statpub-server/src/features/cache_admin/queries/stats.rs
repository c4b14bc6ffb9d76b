use mediator::Request;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;

use crate::cache::{CacheStats, ContentCache};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheStatsQuery {}

impl Request<Result<CacheStats, Infallible>> for CacheStatsQuery {}

impl crate::cqrs::middleware::Query for CacheStatsQuery {}

#[tracing::instrument(skip(cache))]
pub async fn handle(cache: ContentCache, _query: CacheStatsQuery) -> Result<CacheStats, Infallible> {
    Ok(cache.stats())
}
