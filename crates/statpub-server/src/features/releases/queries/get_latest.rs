use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::releases::types::{load_detail, PublicationRef, ReleaseDetail, ReleaseKey};
use crate::features::shared::is_valid_slug;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetLatestReleaseQuery {
    pub publication_slug: String,
}

#[derive(Debug, thiserror::Error)]
pub enum GetLatestReleaseError {
    #[error("Publication '{0}' not found")]
    PublicationNotFound(String),
    #[error("Publication '{0}' has no published release")]
    NoPublishedRelease(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<ReleaseDetail, GetLatestReleaseError>> for GetLatestReleaseQuery {}

impl crate::cqrs::middleware::Query for GetLatestReleaseQuery {}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: GetLatestReleaseQuery,
) -> Result<ReleaseDetail, GetLatestReleaseError> {
    if !is_valid_slug(&query.publication_slug) {
        return Err(GetLatestReleaseError::PublicationNotFound(query.publication_slug));
    }

    let slug = query.publication_slug;
    let publication = PublicationRef::find(&pool, &slug)
        .await?
        .ok_or_else(|| GetLatestReleaseError::PublicationNotFound(slug.clone()))?;

    let Some(latest_id) = publication.latest_published_release_id else {
        return Err(GetLatestReleaseError::NoPublishedRelease(slug));
    };

    load_detail(&pool, &publication, ReleaseKey::Id(latest_id))
        .await?
        .ok_or(GetLatestReleaseError::NoPublishedRelease(slug))
}
