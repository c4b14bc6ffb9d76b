use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::IS_SUPERSEDED;
use crate::features::data_set_files::types::{
    DataSetFileDetail, DataSetFileRow, DATA_SET_FILE_COLUMNS, DATA_SET_FILE_FROM,
};

/// Fetch a data set by its stable data set file id
///
/// A data set appears once per release it was published in; the most
/// recently published version is returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetDataSetFileQuery {
    pub data_set_file_id: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum GetDataSetFileError {
    #[error("Data set file '{0}' not found")]
    NotFound(Uuid),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<DataSetFileDetail, GetDataSetFileError>> for GetDataSetFileQuery {}

impl crate::cqrs::middleware::Query for GetDataSetFileQuery {}

fn detail_sql() -> String {
    format!(
        "SELECT{DATA_SET_FILE_COLUMNS},\n    {IS_SUPERSEDED} AS is_superseded\
         {DATA_SET_FILE_FROM}\n      AND f.data_set_file_id = $1\
         \n    ORDER BY r.published DESC, rf.id ASC\n    LIMIT 1"
    )
}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: GetDataSetFileQuery,
) -> Result<DataSetFileDetail, GetDataSetFileError> {
    let row = sqlx::query_as::<_, DataSetFileRow>(&detail_sql())
        .bind(query.data_set_file_id)
        .fetch_optional(&pool)
        .await?
        .ok_or(GetDataSetFileError::NotFound(query.data_set_file_id))?;

    Ok(row.into_detail())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_sql_picks_latest_publication() {
        let sql = detail_sql();
        assert!(sql.starts_with("SELECT"));
        assert!(sql.contains("f.data_set_file_id = $1"));
        assert!(sql.contains("AS is_superseded"));
        assert!(sql.contains("ORDER BY r.published DESC"));
        assert!(sql.trim_end().ends_with("LIMIT 1"));
    }

    #[test]
    fn test_not_found_message() {
        let id = Uuid::nil();
        assert_eq!(
            GetDataSetFileError::NotFound(id).to_string(),
            format!("Data set file '{}' not found", id)
        );
    }
}
