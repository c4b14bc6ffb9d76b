//! Theme API routes
//!
//! - `GET /api/v1/themes` - Themes with their published publications

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use super::queries::{ListThemesError, ListThemesQuery};
use crate::api::response::{ApiResponse, ErrorResponse};
use crate::features::FeatureState;

pub fn themes_routes() -> Router<FeatureState> {
    Router::new().route("/", get(list_themes))
}

#[tracing::instrument(skip(state))]
async fn list_themes(State(state): State<FeatureState>) -> Result<Response, ThemesApiError> {
    let themes = super::queries::list::handle(state.db, state.cache, ListThemesQuery {}).await?;
    tracing::debug!(count = themes.len(), "Themes listed via API");
    Ok(ApiResponse::success(themes).into_response())
}

#[derive(Debug)]
struct ThemesApiError(ListThemesError);

impl From<ListThemesError> for ThemesApiError {
    fn from(err: ListThemesError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ThemesApiError {
    fn into_response(self) -> Response {
        match self.0 {
            ListThemesError::Database(e) => ErrorResponse::database(&e),
        }
    }
}
