use chrono::{DateTime, Utc};
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use statpub_common::types::ReleaseType;
use uuid::Uuid;

use crate::db::{IS_SUPERSEDED, SUPERSEDING_PUBLICATION_JOIN};
use crate::features::shared::is_valid_slug;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetPublicationQuery {
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeLink {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicationLink {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ReleaseLink {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    #[sqlx(try_from = "String")]
    pub release_type: ReleaseType,
    pub published: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicationDetail {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub theme: ThemeLink,
    pub is_superseded: bool,
    /// Present once the superseding publication has been published
    #[serde(skip_serializing_if = "Option::is_none")]
    pub superseded_by: Option<PublicationLink>,
    pub latest_release: ReleaseLink,
    /// Published releases, newest first
    pub releases: Vec<ReleaseLink>,
}

#[derive(Debug, thiserror::Error)]
pub enum GetPublicationError {
    #[error("Publication '{0}' not found")]
    NotFound(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<PublicationDetail, GetPublicationError>> for GetPublicationQuery {}

impl crate::cqrs::middleware::Query for GetPublicationQuery {}

fn publication_sql() -> String {
    format!(
        r#"SELECT
    p.id, p.slug, p.title, p.summary, p.latest_published_release_id,
    t.id AS theme_id, t.slug AS theme_slug, t.title AS theme_title,
    {IS_SUPERSEDED} AS is_superseded,
    sp.id AS superseded_by_id, sp.slug AS superseded_by_slug, sp.title AS superseded_by_title
FROM publications p
JOIN themes t ON t.id = p.theme_id
{SUPERSEDING_PUBLICATION_JOIN}
WHERE p.slug = $1"#
    )
}

/// Published releases of a publication, newest first
pub(crate) const PUBLISHED_RELEASES_SQL: &str = r#"
SELECT id, slug, title, release_type, published
FROM releases
WHERE publication_id = $1 AND published IS NOT NULL
ORDER BY year DESC, published DESC, id ASC
"#;

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: GetPublicationQuery,
) -> Result<PublicationDetail, GetPublicationError> {
    if !is_valid_slug(&query.slug) {
        return Err(GetPublicationError::NotFound(query.slug));
    }

    let record = sqlx::query_as::<_, PublicationRecord>(&publication_sql())
        .bind(&query.slug)
        .fetch_optional(&pool)
        .await?
        .ok_or_else(|| GetPublicationError::NotFound(query.slug.clone()))?;

    let Some(latest_release_id) = record.latest_published_release_id else {
        tracing::debug!(slug = %query.slug, "Publication has no published release");
        return Err(GetPublicationError::NotFound(query.slug));
    };

    let releases = sqlx::query_as::<_, ReleaseLink>(PUBLISHED_RELEASES_SQL)
        .bind(record.id)
        .fetch_all(&pool)
        .await?;

    let latest_release = releases
        .iter()
        .find(|release| release.id == latest_release_id)
        .cloned()
        .ok_or_else(|| GetPublicationError::NotFound(query.slug.clone()))?;

    Ok(record.into_detail(latest_release, releases))
}

#[derive(Debug, sqlx::FromRow)]
struct PublicationRecord {
    id: Uuid,
    slug: String,
    title: String,
    summary: String,
    latest_published_release_id: Option<Uuid>,
    theme_id: Uuid,
    theme_slug: String,
    theme_title: String,
    is_superseded: bool,
    superseded_by_id: Option<Uuid>,
    superseded_by_slug: Option<String>,
    superseded_by_title: Option<String>,
}

impl PublicationRecord {
    fn into_detail(self, latest_release: ReleaseLink, releases: Vec<ReleaseLink>) -> PublicationDetail {
        let superseded_by = match (
            self.is_superseded,
            self.superseded_by_id,
            self.superseded_by_slug,
            self.superseded_by_title,
        ) {
            (true, Some(id), Some(slug), Some(title)) => Some(PublicationLink { id, slug, title }),
            _ => None,
        };

        PublicationDetail {
            id: self.id,
            slug: self.slug,
            title: self.title,
            summary: self.summary,
            theme: ThemeLink {
                id: self.theme_id,
                slug: self.theme_slug,
                title: self.theme_title,
            },
            is_superseded: superseded_by.is_some(),
            superseded_by,
            latest_release,
            releases,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(is_superseded: bool) -> PublicationRecord {
        PublicationRecord {
            id: Uuid::new_v4(),
            slug: "pupil-absence".to_string(),
            title: "Pupil absence".to_string(),
            summary: String::new(),
            latest_published_release_id: None,
            theme_id: Uuid::new_v4(),
            theme_slug: "pupils".to_string(),
            theme_title: "Pupils".to_string(),
            is_superseded,
            superseded_by_id: Some(Uuid::new_v4()),
            superseded_by_slug: Some("pupil-attendance".to_string()),
            superseded_by_title: Some("Pupil attendance".to_string()),
        }
    }

    fn release() -> ReleaseLink {
        ReleaseLink {
            id: Uuid::new_v4(),
            slug: "2023-24".to_string(),
            title: "Academic year 2023/24".to_string(),
            release_type: ReleaseType::OfficialStatistics,
            published: Utc::now(),
        }
    }

    #[test]
    fn test_superseded_by_only_when_successor_published() {
        let detail = record(false).into_detail(release(), vec![]);
        assert!(!detail.is_superseded);
        assert!(detail.superseded_by.is_none());

        let detail = record(true).into_detail(release(), vec![]);
        assert!(detail.is_superseded);
        assert_eq!(detail.superseded_by.unwrap().slug, "pupil-attendance");
    }

    #[test]
    fn test_sql_joins_successor() {
        let sql = publication_sql();
        assert!(sql.contains(SUPERSEDING_PUBLICATION_JOIN));
        assert!(sql.contains("WHERE p.slug = $1"));
        assert!(PUBLISHED_RELEASES_SQL.contains("ORDER BY year DESC, published DESC"));
    }

    #[tokio::test]
    async fn test_malformed_slug_is_not_found_without_query() {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        let result = handle(pool, GetPublicationQuery { slug: "Not A Slug".to_string() }).await;
        assert!(matches!(result, Err(GetPublicationError::NotFound(slug)) if slug == "Not A Slug"));
    }
}
