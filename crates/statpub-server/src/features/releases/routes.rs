//! Release API routes, mounted under `/api/v1/publications`
//!
//! - `GET /:slug/releases` - Published releases, newest first
//! - `GET /:slug/releases/latest` - The publication's latest release
//! - `GET /:slug/releases/:release_slug` - A release by slug

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::json;

use super::queries::{
    GetLatestReleaseError, GetLatestReleaseQuery, GetReleaseError, GetReleaseQuery,
    ListReleasesError, ListReleasesQuery,
};
use crate::api::response::{ApiResponse, ErrorResponse};
use crate::features::shared::{ApiPath, ApiQuery};
use crate::features::FeatureState;

pub fn releases_routes() -> Router<FeatureState> {
    Router::new()
        .route("/:slug/releases", get(list_releases))
        .route("/:slug/releases/latest", get(get_latest_release))
        .route("/:slug/releases/:release_slug", get(get_release))
}

#[tracing::instrument(skip(state, query), fields(slug = %slug))]
async fn list_releases(
    State(state): State<FeatureState>,
    ApiPath(slug): ApiPath<String>,
    ApiQuery(mut query): ApiQuery<ListReleasesQuery>,
) -> Result<Response, ReleasesApiError> {
    query.publication_slug = slug;

    let response = super::queries::list::handle(state.db, query).await?;
    let meta = json!({ "pagination": response.pagination });
    Ok(ApiResponse::success_with_meta(response.items, meta).into_response())
}

#[tracing::instrument(skip(state), fields(slug = %slug))]
async fn get_latest_release(
    State(state): State<FeatureState>,
    ApiPath(slug): ApiPath<String>,
) -> Result<Response, ReleasesApiError> {
    let query = GetLatestReleaseQuery {
        publication_slug: slug,
    };
    let release = super::queries::get_latest::handle(state.db, query).await?;
    Ok(ApiResponse::success(release).into_response())
}

#[tracing::instrument(skip(state), fields(slug = %slug, release_slug = %release_slug))]
async fn get_release(
    State(state): State<FeatureState>,
    ApiPath((slug, release_slug)): ApiPath<(String, String)>,
) -> Result<Response, ReleasesApiError> {
    let query = GetReleaseQuery {
        publication_slug: slug,
        release_slug,
    };
    let release = super::queries::get::handle(state.db, query).await?;
    Ok(ApiResponse::success(release).into_response())
}

#[derive(Debug)]
enum ReleasesApiError {
    List(ListReleasesError),
    Get(GetReleaseError),
    Latest(GetLatestReleaseError),
}

impl From<ListReleasesError> for ReleasesApiError {
    fn from(err: ListReleasesError) -> Self {
        Self::List(err)
    }
}

impl From<GetReleaseError> for ReleasesApiError {
    fn from(err: GetReleaseError) -> Self {
        Self::Get(err)
    }
}

impl From<GetLatestReleaseError> for ReleasesApiError {
    fn from(err: GetLatestReleaseError) -> Self {
        Self::Latest(err)
    }
}

impl IntoResponse for ReleasesApiError {
    fn into_response(self) -> Response {
        match self {
            ReleasesApiError::List(ListReleasesError::Database(e))
            | ReleasesApiError::Get(GetReleaseError::Database(e))
            | ReleasesApiError::Latest(GetLatestReleaseError::Database(e)) => {
                ErrorResponse::database(&e)
            },

            ReleasesApiError::List(e @ ListReleasesError::PublicationNotFound(_)) => {
                ErrorResponse::not_found(e.to_string())
            },
            ReleasesApiError::List(e) => ErrorResponse::validation(e.to_string()),

            ReleasesApiError::Get(e) => ErrorResponse::not_found(e.to_string()),

            ReleasesApiError::Latest(e) => ErrorResponse::not_found(e.to_string()),
        }
    }
}
