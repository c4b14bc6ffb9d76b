//! Data set file API routes
//!
//! - `GET /api/v1/data-set-files` - Search, filter and sort published data sets
//! - `GET /api/v1/data-set-files/:data_set_file_id` - Latest version of one data set

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::json;
use uuid::Uuid;

use super::queries::{
    GetDataSetFileError, GetDataSetFileQuery, ListDataSetFilesError, ListDataSetFilesQuery,
};
use crate::api::response::{ApiResponse, ErrorResponse};
use crate::features::shared::{ApiPath, ApiQuery};
use crate::features::FeatureState;

pub fn data_set_files_routes() -> Router<FeatureState> {
    Router::new()
        .route("/", get(list_data_set_files))
        .route("/:data_set_file_id", get(get_data_set_file))
}

#[tracing::instrument(
    skip(state, query),
    fields(
        search_term = ?query.search_term,
        publication_id = ?query.publication_id,
        release_id = ?query.release_id,
        sort = ?query.sort
    )
)]
async fn list_data_set_files(
    State(state): State<FeatureState>,
    ApiQuery(query): ApiQuery<ListDataSetFilesQuery>,
) -> Result<Response, DataSetFilesApiError> {
    let response = super::queries::list::handle(state.db, state.cache, query).await?;

    tracing::debug!(
        count = response.items.len(),
        total = response.pagination.total,
        "Data set files listed via API"
    );

    let meta = json!({ "pagination": response.pagination });
    Ok(ApiResponse::success_with_meta(response.items, meta).into_response())
}

#[tracing::instrument(skip(state))]
async fn get_data_set_file(
    State(state): State<FeatureState>,
    ApiPath(data_set_file_id): ApiPath<Uuid>,
) -> Result<Response, DataSetFilesApiError> {
    let query = GetDataSetFileQuery { data_set_file_id };
    let detail = super::queries::get::handle(state.db, query).await?;
    Ok(ApiResponse::success(detail).into_response())
}

#[derive(Debug)]
enum DataSetFilesApiError {
    List(ListDataSetFilesError),
    Get(GetDataSetFileError),
}

impl From<ListDataSetFilesError> for DataSetFilesApiError {
    fn from(err: ListDataSetFilesError) -> Self {
        Self::List(err)
    }
}

impl From<GetDataSetFileError> for DataSetFilesApiError {
    fn from(err: GetDataSetFileError) -> Self {
        Self::Get(err)
    }
}

impl IntoResponse for DataSetFilesApiError {
    fn into_response(self) -> Response {
        match self {
            DataSetFilesApiError::List(ListDataSetFilesError::Database(e))
            | DataSetFilesApiError::Get(GetDataSetFileError::Database(e)) => {
                ErrorResponse::database(&e)
            },
            DataSetFilesApiError::List(e) => ErrorResponse::validation(e.to_string()),
            DataSetFilesApiError::Get(e @ GetDataSetFileError::NotFound(_)) => {
                ErrorResponse::not_found(e.to_string())
            },
        }
    }
}
