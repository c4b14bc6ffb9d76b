//! Theme navigation: every theme with its live publications

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::cache::{ContentCache, THEMES_NAMESPACE};
use crate::db::{NOT_SUPERSEDED, SUPERSEDING_PUBLICATION_JOIN};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListThemesQuery {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemePublication {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeWithPublications {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub publications: Vec<ThemePublication>,
}

#[derive(Debug, thiserror::Error)]
pub enum ListThemesError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Vec<ThemeWithPublications>, ListThemesError>> for ListThemesQuery {}

impl crate::cqrs::middleware::Query for ListThemesQuery {}

fn themes_sql() -> String {
    format!(
        r#"SELECT
    t.id AS theme_id, t.slug AS theme_slug, t.title AS theme_title, t.summary AS theme_summary,
    p.id AS publication_id, p.slug AS publication_slug, p.title AS publication_title
FROM themes t
JOIN publications p ON p.theme_id = t.id
JOIN releases lr ON lr.id = p.latest_published_release_id
{SUPERSEDING_PUBLICATION_JOIN}
WHERE lr.published IS NOT NULL AND {NOT_SUPERSEDED}
ORDER BY LOWER(t.title) ASC, t.id ASC, LOWER(p.title) ASC, p.id ASC"#
    )
}

#[tracing::instrument(skip(pool, cache))]
pub async fn handle(
    pool: PgPool,
    cache: ContentCache,
    query: ListThemesQuery,
) -> Result<Vec<ThemeWithPublications>, ListThemesError> {
    cache
        .get_or_insert_with(THEMES_NAMESPACE, &query, || async {
            let rows = sqlx::query_as::<_, ThemePublicationRow>(&themes_sql())
                .fetch_all(&pool)
                .await?;
            Ok::<_, ListThemesError>(group_by_theme(rows))
        })
        .await
}

#[derive(Debug, sqlx::FromRow)]
struct ThemePublicationRow {
    theme_id: Uuid,
    theme_slug: String,
    theme_title: String,
    theme_summary: String,
    publication_id: Uuid,
    publication_slug: String,
    publication_title: String,
}

/// Fold rows ordered by theme into one entry per theme, keeping row order
fn group_by_theme(rows: Vec<ThemePublicationRow>) -> Vec<ThemeWithPublications> {
    let mut themes: Vec<ThemeWithPublications> = Vec::new();

    for row in rows {
        let publication = ThemePublication {
            id: row.publication_id,
            slug: row.publication_slug,
            title: row.publication_title,
        };

        match themes.last_mut() {
            Some(theme) if theme.id == row.theme_id => theme.publications.push(publication),
            _ => themes.push(ThemeWithPublications {
                id: row.theme_id,
                slug: row.theme_slug,
                title: row.theme_title,
                summary: row.theme_summary,
                publications: vec![publication],
            }),
        }
    }

    themes
}
