use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use statpub_common::types::ReleaseType;
use uuid::Uuid;

/// A published release as listed under its publication
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ReleaseSummary {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    #[sqlx(try_from = "String")]
    pub release_type: ReleaseType,
    pub year: i32,
    pub time_period_coverage: String,
    pub published: DateTime<Utc>,
    pub is_latest_release: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleasePublication {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseDetail {
    #[serde(flatten)]
    pub release: ReleaseSummary,
    pub publication: ReleasePublication,
    /// Number of published data files in the release
    pub data_set_count: i64,
}

/// Columns for [`ReleaseSummary`]; `r` is the release, `p` its publication
pub(crate) const RELEASE_SUMMARY_COLUMNS: &str = r#"
    r.id, r.slug, r.title, r.release_type, r.year, r.time_period_coverage, r.published,
    (p.latest_published_release_id IS NOT DISTINCT FROM r.id) AS is_latest_release"#;

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct PublicationRef {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub latest_published_release_id: Option<Uuid>,
}

impl PublicationRef {
    pub async fn find(pool: &PgPool, slug: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, PublicationRef>(
            r#"
            SELECT id, slug, title, latest_published_release_id
            FROM publications
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(pool)
        .await
    }

    pub fn link(&self) -> ReleasePublication {
        ReleasePublication {
            id: self.id,
            slug: self.slug.clone(),
            title: self.title.clone(),
        }
    }
}

/// Load one published release of `publication` with its data set count
pub(crate) async fn load_detail(
    pool: &PgPool,
    publication: &PublicationRef,
    key: ReleaseKey<'_>,
) -> Result<Option<ReleaseDetail>, sqlx::Error> {
    let predicate = key.predicate();
    let sql = format!(
        "SELECT{RELEASE_SUMMARY_COLUMNS}
    FROM releases r
    JOIN publications p ON p.id = r.publication_id
    WHERE r.publication_id = $1 AND r.published IS NOT NULL AND {predicate}"
    );

    let query = sqlx::query_as::<_, ReleaseSummary>(&sql).bind(publication.id);
    let query = match key {
        ReleaseKey::Id(id) => query.bind(id),
        ReleaseKey::Slug(slug) => query.bind(slug),
    };

    let Some(release) = query.fetch_optional(pool).await? else {
        return Ok(None);
    };

    let data_set_count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM release_files rf
        JOIN files f ON f.id = rf.file_id
        WHERE rf.release_id = $1 AND f.file_type = 'data' AND rf.published IS NOT NULL
        "#,
    )
    .bind(release.id)
    .fetch_one(pool)
    .await?;

    Ok(Some(ReleaseDetail {
        release,
        publication: publication.link(),
        data_set_count,
    }))
}

/// How a release is identified within its publication
#[derive(Debug, Clone, Copy)]
pub(crate) enum ReleaseKey<'a> {
    Id(Uuid),
    Slug(&'a str),
}

impl ReleaseKey<'_> {
    fn predicate(self) -> &'static str {
        match self {
            ReleaseKey::Id(_) => "r.id = $2",
            ReleaseKey::Slug(_) => "r.slug = $2",
        }
    }
}
