//! Data set file listing
//!
//! The query string is first resolved into a [`ResolvedDataSetFilesQuery`]:
//! validated, with every default filled in. The resolved form drives both
//! the SQL and the cache key, so equivalent requests share a cache entry.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use statpub_common::types::{GeographicLevel, SortDirection};
use uuid::Uuid;

use crate::cache::{ContentCache, DATA_SET_FILES_NAMESPACE};
use crate::db::{IS_SUPERSEDED, NOT_SUPERSEDED};
use crate::features::data_set_files::types::{
    DataSetFileRow, DataSetFileSort, DataSetFileSummary, DataSetType, DATA_SET_FILE_COLUMNS,
    DATA_SET_FILE_FROM,
};
use crate::features::shared::{
    normalize_search_term, Paginated, PaginationError, PaginationParams, SearchTermError,
};

/// Query-string parameters for `GET /api/v1/data-set-files`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListDataSetFilesQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_id: Option<Uuid>,
    /// Level code, e.g. `LA`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geographic_level: Option<String>,
    /// Restrict to each publication's latest release. Defaults to true.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_set_type: Option<DataSetType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<DataSetFileSort>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_direction: Option<SortDirection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<i64>,
}

/// A validated listing request with defaults applied
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ResolvedDataSetFilesQuery {
    pub theme_id: Option<Uuid>,
    pub publication_id: Option<Uuid>,
    pub release_id: Option<Uuid>,
    pub geographic_level: Option<GeographicLevel>,
    pub latest_only: bool,
    pub data_set_type: DataSetType,
    pub search_term: Option<String>,
    pub sort: DataSetFileSort,
    pub sort_direction: SortDirection,
    pub pagination: PaginationParams,
}

pub type ListDataSetFilesResponse = Paginated<DataSetFileSummary>;

#[derive(Debug, thiserror::Error)]
pub enum ListDataSetFilesError {
    #[error(transparent)]
    Pagination(#[from] PaginationError),
    #[error(transparent)]
    SearchTerm(#[from] SearchTermError),
    #[error("Unknown geographic level: {0}")]
    InvalidGeographicLevel(String),
    #[error("Sorting by relevance requires a search term")]
    RelevanceWithoutSearchTerm,
    #[error("Sorting by natural order requires a release_id")]
    NaturalWithoutRelease,
    #[error("Filtering by release_id requires a publication_id")]
    ReleaseWithoutPublication,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ListDataSetFilesError {
    pub fn is_validation(&self) -> bool {
        !matches!(self, ListDataSetFilesError::Database(_))
    }
}

impl Request<Result<ListDataSetFilesResponse, ListDataSetFilesError>> for ListDataSetFilesQuery {}

impl crate::cqrs::middleware::Query for ListDataSetFilesQuery {}

impl ListDataSetFilesQuery {
    pub fn resolve(&self) -> Result<ResolvedDataSetFilesQuery, ListDataSetFilesError> {
        let pagination = PaginationParams::new(self.page, self.per_page);
        pagination.validate()?;

        if self.release_id.is_some() && self.publication_id.is_none() {
            return Err(ListDataSetFilesError::ReleaseWithoutPublication);
        }

        let search_term = normalize_search_term(self.search_term.as_deref())?;

        let geographic_level = self
            .geographic_level
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(|code| {
                code.parse::<GeographicLevel>()
                    .map_err(|_| ListDataSetFilesError::InvalidGeographicLevel(code.to_string()))
            })
            .transpose()?;

        let sort = match self.sort {
            Some(sort) => sort,
            None if search_term.is_some() => DataSetFileSort::Relevance,
            None if self.release_id.is_some() => DataSetFileSort::Natural,
            None => DataSetFileSort::Title,
        };

        match sort {
            DataSetFileSort::Relevance if search_term.is_none() => {
                return Err(ListDataSetFilesError::RelevanceWithoutSearchTerm)
            },
            DataSetFileSort::Natural if self.release_id.is_none() => {
                return Err(ListDataSetFilesError::NaturalWithoutRelease)
            },
            _ => {},
        }

        Ok(ResolvedDataSetFilesQuery {
            theme_id: self.theme_id,
            publication_id: self.publication_id,
            release_id: self.release_id,
            geographic_level,
            // A specific release is never narrowed to the latest one
            latest_only: self.release_id.is_none() && self.latest_only.unwrap_or(true),
            data_set_type: self.data_set_type.unwrap_or_default(),
            search_term,
            sort,
            sort_direction: self.sort_direction.unwrap_or_else(|| sort.default_direction()),
            pagination: pagination.resolved(),
        })
    }
}

impl ResolvedDataSetFilesQuery {
    /// Supersession only hides data sets when browsing across publications
    fn excludes_superseded(&self) -> bool {
        self.publication_id.is_none() && self.release_id.is_none()
    }

    /// Append the filter predicates shared by the page and count queries
    fn push_filters(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        if let Some(theme_id) = self.theme_id {
            builder.push(" AND t.id = ").push_bind(theme_id);
        }
        if let Some(publication_id) = self.publication_id {
            builder.push(" AND p.id = ").push_bind(publication_id);
        }
        if let Some(release_id) = self.release_id {
            builder.push(" AND r.id = ").push_bind(release_id);
        }
        if let Some(level) = self.geographic_level {
            builder
                .push(" AND ")
                .push_bind(level.code().to_string())
                .push(" = ANY(f.geographic_levels)");
        }
        if self.data_set_type == DataSetType::Api {
            builder.push(" AND rf.api_data_set_id IS NOT NULL");
        }
        if let Some(ref term) = self.search_term {
            builder
                .push(" AND rf.search_vector @@ plainto_tsquery('english', ")
                .push_bind(term.clone())
                .push(")");
        }
        if self.latest_only {
            builder.push(" AND r.id = p.latest_published_release_id");
        }
        if self.excludes_superseded() {
            builder.push(" AND ").push(NOT_SUPERSEDED);
        }
    }

    fn page_query(&self) -> QueryBuilder<'_, Postgres> {
        let mut builder = QueryBuilder::new("SELECT");
        builder.push(DATA_SET_FILE_COLUMNS);
        builder.push(",\n    ").push(IS_SUPERSEDED).push(" AS is_superseded");

        match self.search_term {
            Some(ref term) => {
                builder
                    .push(",\n    ts_rank(rf.search_vector, plainto_tsquery('english', ")
                    .push_bind(term.clone())
                    .push(")) AS relevance");
            },
            None => {
                builder.push(",\n    0::REAL AS relevance");
            },
        }

        builder.push(DATA_SET_FILE_FROM);
        self.push_filters(&mut builder);

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
        builder.push(DATA_SET_FILE_FROM);
        self.push_filters(&mut builder);
        builder
    }
}

#[tracing::instrument(skip(pool, cache))]
pub async fn handle(
    pool: PgPool,
    cache: ContentCache,
    query: ListDataSetFilesQuery,
) -> Result<ListDataSetFilesResponse, ListDataSetFilesError> {
    let resolved = query.resolve()?;

    cache
        .get_or_insert_with(DATA_SET_FILES_NAMESPACE, &resolved, || fetch(&pool, &resolved))
        .await
}

async fn fetch(
    pool: &PgPool,
    query: &ResolvedDataSetFilesQuery,
) -> Result<ListDataSetFilesResponse, ListDataSetFilesError> {
    let total: i64 = query.count_query().build_query_scalar().fetch_one(pool).await?;

    let rows: Vec<DataSetFileRow> = if total > query.pagination.offset() {
        query.page_query().build_query_as().fetch_all(pool).await?
    } else {
        Vec::new()
    };

    tracing::debug!(total, returned = rows.len(), sort = ?query.sort, "Listed data set files");

    Ok(Paginated::from_items(rows, &query.pagination, total).map(DataSetFileRow::into_summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Execute;

    fn release_query() -> ListDataSetFilesQuery {
        ListDataSetFilesQuery {
            publication_id: Some(Uuid::new_v4()),
            release_id: Some(Uuid::new_v4()),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let resolved = ListDataSetFilesQuery::default().resolve().unwrap();
        assert_eq!(resolved.sort, DataSetFileSort::Title);
        assert_eq!(resolved.sort_direction, SortDirection::Asc);
        assert!(resolved.latest_only);
        assert_eq!(resolved.data_set_type, DataSetType::All);
        assert_eq!(resolved.pagination, PaginationParams::new(Some(1), Some(20)));
        assert!(resolved.excludes_superseded());
    }

    #[test]
    fn test_search_defaults_to_relevance_desc() {
        let query = ListDataSetFilesQuery {
            search_term: Some("  pupil absence ".to_string()),
            ..Default::default()
        };
        let resolved = query.resolve().unwrap();
        assert_eq!(resolved.search_term.as_deref(), Some("pupil absence"));
        assert_eq!(resolved.sort, DataSetFileSort::Relevance);
        assert_eq!(resolved.sort_direction, SortDirection::Desc);
    }

    #[test]
    fn test_release_defaults_to_natural_and_ignores_latest_only() {
        let query = ListDataSetFilesQuery {
            latest_only: Some(true),
            ..release_query()
        };
        let resolved = query.resolve().unwrap();
        assert_eq!(resolved.sort, DataSetFileSort::Natural);
        assert_eq!(resolved.sort_direction, SortDirection::Asc);
        assert!(!resolved.latest_only);
        assert!(!resolved.excludes_superseded());
    }

    #[test]
    fn test_explicit_direction_wins() {
        let query = ListDataSetFilesQuery {
            sort: Some(DataSetFileSort::Published),
            sort_direction: Some(SortDirection::Asc),
            ..Default::default()
        };
        assert_eq!(query.resolve().unwrap().sort_direction, SortDirection::Asc);
    }

    #[test]
    fn test_relevance_requires_search_term() {
        let query = ListDataSetFilesQuery {
            sort: Some(DataSetFileSort::Relevance),
            search_term: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            query.resolve(),
            Err(ListDataSetFilesError::RelevanceWithoutSearchTerm)
        ));
    }

    #[test]
    fn test_natural_requires_release() {
        let query = ListDataSetFilesQuery {
            sort: Some(DataSetFileSort::Natural),
            publication_id: Some(Uuid::new_v4()),
            ..Default::default()
        };
        assert!(matches!(query.resolve(), Err(ListDataSetFilesError::NaturalWithoutRelease)));
    }

    #[test]
    fn test_release_requires_publication() {
        let query = ListDataSetFilesQuery {
            release_id: Some(Uuid::new_v4()),
            ..Default::default()
        };
        assert!(matches!(
            query.resolve(),
            Err(ListDataSetFilesError::ReleaseWithoutPublication)
        ));
    }

    #[test]
    fn test_short_search_term_rejected() {
        let query = ListDataSetFilesQuery {
            search_term: Some("ab".to_string()),
            ..Default::default()
        };
        let err = query.resolve().unwrap_err();
        assert!(err.is_validation());
        assert!(matches!(err, ListDataSetFilesError::SearchTerm(SearchTermError::TooShort)));
    }

    #[test]
    fn test_pagination_rejected() {
        let query = ListDataSetFilesQuery {
            per_page: Some(500),
            ..Default::default()
        };
        assert!(matches!(
            query.resolve(),
            Err(ListDataSetFilesError::Pagination(PaginationError::InvalidPerPage))
        ));
    }

    #[test]
    fn test_geographic_level_parsed_case_insensitively() {
        let query = ListDataSetFilesQuery {
            geographic_level: Some("la".to_string()),
            ..Default::default()
        };
        assert_eq!(
            query.resolve().unwrap().geographic_level,
            Some(GeographicLevel::LocalAuthority)
        );

        let unknown = ListDataSetFilesQuery {
            geographic_level: Some("XYZ".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            unknown.resolve(),
            Err(ListDataSetFilesError::InvalidGeographicLevel(code)) if code == "XYZ"
        ));
    }

    #[test]
    fn test_equivalent_queries_resolve_to_the_same_cache_key() {
        let implicit = ListDataSetFilesQuery::default().resolve().unwrap();
        let explicit = ListDataSetFilesQuery {
            latest_only: Some(true),
            sort: Some(DataSetFileSort::Title),
            sort_direction: Some(SortDirection::Asc),
            page: Some(1),
            per_page: Some(20),
            search_term: Some(" ".to_string()),
            ..Default::default()
        }
        .resolve()
        .unwrap();

        assert_eq!(
            ContentCache::key(DATA_SET_FILES_NAMESPACE, &implicit).unwrap(),
            ContentCache::key(DATA_SET_FILES_NAMESPACE, &explicit).unwrap()
        );
    }

    #[test]
    fn test_page_query_sql() {
        let resolved = ListDataSetFilesQuery {
            theme_id: Some(Uuid::new_v4()),
            geographic_level: Some("NAT".to_string()),
            data_set_type: Some(DataSetType::Api),
            search_term: Some("attendance".to_string()),
            ..Default::default()
        }
        .resolve()
        .unwrap();

        let mut builder = resolved.page_query();
        let sql = builder.build().sql().to_string();

        assert!(sql.contains("ts_rank(rf.search_vector"));
        assert!(sql.contains("AND t.id = $"));
        assert!(sql.contains("= ANY(f.geographic_levels)"));
        assert!(sql.contains("rf.api_data_set_id IS NOT NULL"));
        assert!(sql.contains("r.id = p.latest_published_release_id"));
        assert!(sql.contains(NOT_SUPERSEDED));
        assert!(sql.contains("ORDER BY relevance DESC"));
        assert!(!sql.contains("AND p.id ="));
    }

    #[test]
    fn test_count_query_skips_supersession_for_publication() {
        let resolved = ListDataSetFilesQuery {
            publication_id: Some(Uuid::new_v4()),
            latest_only: Some(false),
            ..Default::default()
        }
        .resolve()
        .unwrap();

        let mut builder = resolved.count_query();
        let sql = builder.build().sql().to_string();

        assert!(sql.starts_with("SELECT COUNT(*)"));
        assert!(sql.contains("AND p.id = $1"));
        assert!(!sql.contains(NOT_SUPERSEDED));
        assert!(!sql.contains("r.id = p.latest_published_release_id"));
        assert!(!sql.contains("ORDER BY"));
    }
}
