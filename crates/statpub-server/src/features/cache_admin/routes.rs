//! Cache administration routes
//!
//! - `GET /api/v1/cache/stats` - Occupancy and hit rate
//! - `DELETE /api/v1/cache?namespace=` - Clear one namespace or everything

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::{delete, get},
    Router,
};

use super::commands::{ClearCacheCommand, ClearCacheError};
use super::queries::CacheStatsQuery;
use crate::api::response::{ApiResponse, ErrorResponse};
use crate::features::shared::ApiQuery;
use crate::features::FeatureState;

pub fn cache_routes() -> Router<FeatureState> {
    Router::new()
        .route("/", delete(clear_cache))
        .route("/stats", get(cache_stats))
}

#[tracing::instrument(skip(state))]
async fn cache_stats(State(state): State<FeatureState>) -> Response {
    match super::queries::stats::handle(state.cache, CacheStatsQuery {}).await {
        Ok(stats) => ApiResponse::success(stats).into_response(),
        Err(never) => match never {},
    }
}

#[tracing::instrument(skip(state))]
async fn clear_cache(
    State(state): State<FeatureState>,
    ApiQuery(command): ApiQuery<ClearCacheCommand>,
) -> Result<Response, ClearCacheError> {
    let response = super::commands::clear::handle(state.cache, command).await?;
    Ok(ApiResponse::success(response).into_response())
}

impl IntoResponse for ClearCacheError {
    fn into_response(self) -> Response {
        ErrorResponse::validation(self.to_string())
    }
}
