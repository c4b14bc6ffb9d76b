//! Publication API routes
//!
//! - `GET /api/v1/publications` - Published, non-superseded publications
//! - `GET /api/v1/publications/:slug` - Publication detail with its releases
//! - `GET /api/v1/publications/:slug/title` - Id and title only
//!
//! Release routes under `/:slug/releases` are merged in from the releases
//! feature.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::json;

use super::queries::{
    GetPublicationError, GetPublicationQuery, GetPublicationTitleError, GetPublicationTitleQuery,
    ListPublicationsError, ListPublicationsQuery,
};
use crate::api::response::{ApiResponse, ErrorResponse};
use crate::features::shared::{ApiPath, ApiQuery};
use crate::features::{releases, FeatureState};

pub fn publications_routes() -> Router<FeatureState> {
    Router::new()
        .route("/", get(list_publications))
        .route("/:slug", get(get_publication))
        .route("/:slug/title", get(get_publication_title))
        .merge(releases::releases_routes())
}

#[tracing::instrument(
    skip(state, query),
    fields(search = ?query.search, theme_id = ?query.theme_id, sort = ?query.sort)
)]
async fn list_publications(
    State(state): State<FeatureState>,
    ApiQuery(query): ApiQuery<ListPublicationsQuery>,
) -> Result<Response, PublicationsApiError> {
    let response = super::queries::list::handle(state.db, state.cache, query).await?;

    tracing::debug!(
        count = response.items.len(),
        total = response.pagination.total,
        "Publications listed via API"
    );

    let meta = json!({ "pagination": response.pagination });
    Ok(ApiResponse::success_with_meta(response.items, meta).into_response())
}

#[tracing::instrument(skip(state), fields(slug = %slug))]
async fn get_publication(
    State(state): State<FeatureState>,
    ApiPath(slug): ApiPath<String>,
) -> Result<Response, PublicationsApiError> {
    let publication = super::queries::get::handle(state.db, GetPublicationQuery { slug }).await?;
    Ok(ApiResponse::success(publication).into_response())
}

#[tracing::instrument(skip(state), fields(slug = %slug))]
async fn get_publication_title(
    State(state): State<FeatureState>,
    ApiPath(slug): ApiPath<String>,
) -> Result<Response, PublicationsApiError> {
    let title =
        super::queries::get_title::handle(state.db, GetPublicationTitleQuery { slug }).await?;
    Ok(ApiResponse::success(title).into_response())
}

#[derive(Debug)]
enum PublicationsApiError {
    List(ListPublicationsError),
    Get(GetPublicationError),
    Title(GetPublicationTitleError),
}

impl From<ListPublicationsError> for PublicationsApiError {
    fn from(err: ListPublicationsError) -> Self {
        Self::List(err)
    }
}

impl From<GetPublicationError> for PublicationsApiError {
    fn from(err: GetPublicationError) -> Self {
        Self::Get(err)
    }
}

impl From<GetPublicationTitleError> for PublicationsApiError {
    fn from(err: GetPublicationTitleError) -> Self {
        Self::Title(err)
    }
}

impl IntoResponse for PublicationsApiError {
    fn into_response(self) -> Response {
        match self {
            PublicationsApiError::List(ListPublicationsError::Database(e))
            | PublicationsApiError::Get(GetPublicationError::Database(e))
            | PublicationsApiError::Title(GetPublicationTitleError::Database(e)) => {
                ErrorResponse::database(&e)
            },
            PublicationsApiError::List(e) => ErrorResponse::validation(e.to_string()),
            PublicationsApiError::Get(e @ GetPublicationError::NotFound(_)) => {
                ErrorResponse::not_found(e.to_string())
            },
            PublicationsApiError::Title(e @ GetPublicationTitleError::NotFound(_)) => {
                ErrorResponse::not_found(e.to_string())
            },
        }
    }
}
