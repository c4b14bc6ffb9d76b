use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::shared::is_valid_slug;

/// Lightweight lookup used for page titles and breadcrumbs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetPublicationTitleQuery {
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PublicationTitle {
    pub id: Uuid,
    pub title: String,
}

#[derive(Debug, thiserror::Error)]
pub enum GetPublicationTitleError {
    #[error("Publication '{0}' not found")]
    NotFound(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<PublicationTitle, GetPublicationTitleError>> for GetPublicationTitleQuery {}

impl crate::cqrs::middleware::Query for GetPublicationTitleQuery {}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: GetPublicationTitleQuery,
) -> Result<PublicationTitle, GetPublicationTitleError> {
    if !is_valid_slug(&query.slug) {
        return Err(GetPublicationTitleError::NotFound(query.slug));
    }

    sqlx::query_as::<_, PublicationTitle>(
        r#"
        SELECT id, title
        FROM publications
        WHERE slug = $1 AND latest_published_release_id IS NOT NULL
        "#,
    )
    .bind(&query.slug)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| GetPublicationTitleError::NotFound(query.slug.clone()))
}
