use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::releases::types::{load_detail, PublicationRef, ReleaseDetail, ReleaseKey};
use crate::features::shared::is_valid_slug;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetReleaseQuery {
    pub publication_slug: String,
    pub release_slug: String,
}

#[derive(Debug, thiserror::Error)]
pub enum GetReleaseError {
    #[error("Publication '{0}' not found")]
    PublicationNotFound(String),
    #[error("Release '{release_slug}' of publication '{publication_slug}' not found")]
    NotFound {
        publication_slug: String,
        release_slug: String,
    },
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<ReleaseDetail, GetReleaseError>> for GetReleaseQuery {}

impl crate::cqrs::middleware::Query for GetReleaseQuery {}

/// Fetch a published release by slug. Unpublished releases are reported as
/// not found.
#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, query: GetReleaseQuery) -> Result<ReleaseDetail, GetReleaseError> {
    if !is_valid_slug(&query.publication_slug) {
        return Err(GetReleaseError::PublicationNotFound(query.publication_slug));
    }
    if !is_valid_slug(&query.release_slug) {
        return Err(GetReleaseError::NotFound {
            publication_slug: query.publication_slug,
            release_slug: query.release_slug,
        });
    }

    let publication = PublicationRef::find(&pool, &query.publication_slug)
        .await?
        .ok_or_else(|| GetReleaseError::PublicationNotFound(query.publication_slug.clone()))?;

    load_detail(&pool, &publication, ReleaseKey::Slug(&query.release_slug))
        .await?
        .ok_or_else(|| GetReleaseError::NotFound {
            publication_slug: query.publication_slug.clone(),
            release_slug: query.release_slug.clone(),
        })
}
