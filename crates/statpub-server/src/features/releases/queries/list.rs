use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::releases::types::{PublicationRef, ReleaseSummary, RELEASE_SUMMARY_COLUMNS};
use crate::features::shared::{is_valid_slug, Paginated, PaginationError, PaginationParams};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListReleasesQuery {
    /// Taken from the path
    #[serde(default)]
    pub publication_slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<i64>,
}

pub type ListReleasesResponse = Paginated<ReleaseSummary>;

#[derive(Debug, thiserror::Error)]
pub enum ListReleasesError {
    #[error(transparent)]
    Pagination(#[from] PaginationError),
    #[error("Publication '{0}' not found")]
    PublicationNotFound(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<ListReleasesResponse, ListReleasesError>> for ListReleasesQuery {}

impl crate::cqrs::middleware::Query for ListReleasesQuery {}

fn page_sql() -> String {
    format!(
        "SELECT{RELEASE_SUMMARY_COLUMNS}
    FROM releases r
    JOIN publications p ON p.id = r.publication_id
    WHERE r.publication_id = $1 AND r.published IS NOT NULL
    ORDER BY r.year DESC, r.published DESC, r.id ASC
    LIMIT $2 OFFSET $3"
    )
}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: ListReleasesQuery,
) -> Result<ListReleasesResponse, ListReleasesError> {
    let pagination = PaginationParams::new(query.page, query.per_page);
    pagination.validate()?;
    if !is_valid_slug(&query.publication_slug) {
        return Err(ListReleasesError::PublicationNotFound(query.publication_slug));
    }

    let publication = PublicationRef::find(&pool, &query.publication_slug)
        .await?
        .ok_or_else(|| ListReleasesError::PublicationNotFound(query.publication_slug.clone()))?;

    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM releases
        WHERE publication_id = $1 AND published IS NOT NULL
        "#,
    )
    .bind(publication.id)
    .fetch_one(&pool)
    .await?;

    let items = sqlx::query_as::<_, ReleaseSummary>(&page_sql())
        .bind(publication.id)
        .bind(pagination.per_page())
        .bind(pagination.offset())
        .fetch_all(&pool)
        .await?;

    Ok(Paginated::from_items(items, &pagination, total))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_sql_orders_newest_first() {
        let sql = page_sql();
        assert!(sql.contains("ORDER BY r.year DESC, r.published DESC, r.id ASC"));
        assert!(sql.contains("r.published IS NOT NULL"));
    }

    #[tokio::test]
    async fn test_validation_runs_before_query() {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();

        let query = ListReleasesQuery {
            publication_slug: "pupil-absence".to_string(),
            page: Some(0),
            per_page: None,
        };
        assert!(matches!(
            handle(pool.clone(), query).await,
            Err(ListReleasesError::Pagination(PaginationError::InvalidPage))
        ));

        let query = ListReleasesQuery {
            publication_slug: "Pupil Absence".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            handle(pool, query).await,
            Err(ListReleasesError::PublicationNotFound(slug)) if slug == "Pupil Absence"
        ));
    }
}
