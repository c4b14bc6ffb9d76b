use chrono::{DateTime, Utc};
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use statpub_common::types::{ReleaseType, SortDirection};
use uuid::Uuid;

use crate::cache::{ContentCache, PUBLICATIONS_NAMESPACE};
use crate::db::{NOT_SUPERSEDED, SUPERSEDING_PUBLICATION_JOIN};
use crate::features::shared::{
    normalize_search_term, Paginated, PaginationError, PaginationParams, SearchTermError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicationSort {
    Title,
    /// Publication date of the latest release
    Published,
    Relevance,
}

impl PublicationSort {
    pub fn default_direction(self) -> SortDirection {
        match self {
            PublicationSort::Title => SortDirection::Asc,
            PublicationSort::Published | PublicationSort::Relevance => SortDirection::Desc,
        }
    }

    fn order_by(self, direction: SortDirection) -> String {
        let dir = direction.as_sql();
        match self {
            PublicationSort::Title => format!("LOWER(p.title) {dir}, p.id ASC"),
            PublicationSort::Published => {
                format!("lr.published {dir}, LOWER(p.title) ASC, p.id ASC")
            },
            PublicationSort::Relevance => {
                format!("relevance {dir}, LOWER(p.title) ASC, p.id ASC")
            },
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListPublicationsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<PublicationSort>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_direction: Option<SortDirection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ResolvedPublicationsQuery {
    pub theme_id: Option<Uuid>,
    pub release_type: Option<ReleaseType>,
    pub search: Option<String>,
    pub sort: PublicationSort,
    pub sort_direction: SortDirection,
    pub pagination: PaginationParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicationListItem {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub theme_id: Uuid,
    pub theme_title: String,
    pub latest_release_id: Uuid,
    pub latest_release_slug: String,
    pub release_type: ReleaseType,
    pub published: DateTime<Utc>,
}

pub type ListPublicationsResponse = Paginated<PublicationListItem>;

#[derive(Debug, thiserror::Error)]
pub enum ListPublicationsError {
    #[error(transparent)]
    Pagination(#[from] PaginationError),
    #[error(transparent)]
    SearchTerm(#[from] SearchTermError),
    #[error("Unknown release type: {0}")]
    InvalidReleaseType(String),
    #[error("Sorting by relevance requires a search term")]
    RelevanceWithoutSearch,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<ListPublicationsResponse, ListPublicationsError>> for ListPublicationsQuery {}

impl crate::cqrs::middleware::Query for ListPublicationsQuery {}

impl ListPublicationsQuery {
    pub fn resolve(&self) -> Result<ResolvedPublicationsQuery, ListPublicationsError> {
        let pagination = PaginationParams::new(self.page, self.per_page);
        pagination.validate()?;

        let search = normalize_search_term(self.search.as_deref())?;

        let release_type = self
            .release_type
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<ReleaseType>()
                    .map_err(|_| ListPublicationsError::InvalidReleaseType(s.to_string()))
            })
            .transpose()?;

        let sort = match (self.sort, &search) {
            (Some(PublicationSort::Relevance), None) => {
                return Err(ListPublicationsError::RelevanceWithoutSearch)
            },
            (Some(sort), _) => sort,
            (None, Some(_)) => PublicationSort::Relevance,
            (None, None) => PublicationSort::Title,
        };

        Ok(ResolvedPublicationsQuery {
            theme_id: self.theme_id,
            release_type,
            search,
            sort,
            sort_direction: self.sort_direction.unwrap_or_else(|| sort.default_direction()),
            pagination: pagination.resolved(),
        })
    }
}

const PUBLICATIONS_FROM: &str = r#"
    FROM publications p
    JOIN themes t ON t.id = p.theme_id
    JOIN releases lr ON lr.id = p.latest_published_release_id"#;

impl ResolvedPublicationsQuery {
    fn push_from_and_filters(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        builder
            .push(PUBLICATIONS_FROM)
            .push("\n    ")
            .push(SUPERSEDING_PUBLICATION_JOIN)
            .push("\n    WHERE lr.published IS NOT NULL AND ")
            .push(NOT_SUPERSEDED);

        if let Some(theme_id) = self.theme_id {
            builder.push(" AND t.id = ").push_bind(theme_id);
        }
        if let Some(release_type) = self.release_type {
            builder
                .push(" AND lr.release_type = ")
                .push_bind(release_type.as_str());
        }
        if let Some(ref search) = self.search {
            builder
                .push(" AND p.search_vector @@ plainto_tsquery('english', ")
                .push_bind(search.clone())
                .push(")");
        }
    }

    fn page_query(&self) -> QueryBuilder<'_, Postgres> {
        let mut builder = QueryBuilder::new(
            r#"SELECT
    p.id, p.slug, p.title, p.summary,
    t.id AS theme_id, t.title AS theme_title,
    lr.id AS latest_release_id, lr.slug AS latest_release_slug,
    lr.release_type, lr.published"#,
        );

        match self.search {
            Some(ref search) => {
                builder
                    .push(",\n    ts_rank(p.search_vector, plainto_tsquery('english', ")
                    .push_bind(search.clone())
                    .push(")) AS relevance");
            },
            None => {
                builder.push(",\n    0::REAL AS relevance");
            },
        }

        self.push_from_and_filters(&mut builder);

        builder
            .push(" ORDER BY ")
            .push(self.sort.order_by(self.sort_direction))
            .push(" LIMIT ")
            .push_bind(self.pagination.per_page())
            .push(" OFFSET ")
            .push_bind(self.pagination.offset());

        builder
    }

    fn count_query(&self) -> QueryBuilder<'_, Postgres> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*)");
        self.push_from_and_filters(&mut builder);
        builder
    }
}

#[tracing::instrument(skip(pool, cache))]
pub async fn handle(
    pool: PgPool,
    cache: ContentCache,
    query: ListPublicationsQuery,
) -> Result<ListPublicationsResponse, ListPublicationsError> {
    let resolved = query.resolve()?;

    cache
        .get_or_insert_with(PUBLICATIONS_NAMESPACE, &resolved, || fetch(&pool, &resolved))
        .await
}

async fn fetch(
    pool: &PgPool,
    query: &ResolvedPublicationsQuery,
) -> Result<ListPublicationsResponse, ListPublicationsError> {
    let total: i64 = query.count_query().build_query_scalar().fetch_one(pool).await?;

    let records: Vec<PublicationRecord> = if total > query.pagination.offset() {
        query.page_query().build_query_as().fetch_all(pool).await?
    } else {
        Vec::new()
    };

    let items = records
        .into_iter()
        .map(|r| PublicationListItem {
            id: r.id,
            slug: r.slug,
            title: r.title,
            summary: r.summary,
            theme_id: r.theme_id,
            theme_title: r.theme_title,
            latest_release_id: r.latest_release_id,
            latest_release_slug: r.latest_release_slug,
            release_type: r.release_type,
            published: r.published,
        })
        .collect();

    Ok(Paginated::from_items(items, &query.pagination, total))
}

#[derive(Debug, sqlx::FromRow)]
struct PublicationRecord {
    id: Uuid,
    slug: String,
    title: String,
    summary: String,
    theme_id: Uuid,
    theme_title: String,
    latest_release_id: Uuid,
    latest_release_slug: String,
    #[sqlx(try_from = "String")]
    release_type: ReleaseType,
    published: DateTime<Utc>,
}
