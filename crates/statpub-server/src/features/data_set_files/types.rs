//! Data set file response types and the row they are read from

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use statpub_common::types::{GeographicLevel, ReleaseType, SortDirection};
use uuid::Uuid;

/// Which data sets to include
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DataSetType {
    #[default]
    All,
    /// Only data sets also exposed through the public data API
    Api,
}

/// Sort keys for data set listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSetFileSort {
    /// Order set by the publisher within a release
    Natural,
    Title,
    Published,
    Relevance,
}

impl DataSetFileSort {
    pub fn default_direction(self) -> SortDirection {
        match self {
            DataSetFileSort::Natural | DataSetFileSort::Title => SortDirection::Asc,
            DataSetFileSort::Published | DataSetFileSort::Relevance => SortDirection::Desc,
        }
    }

    /// ORDER BY clause (without the keyword) for this key
    ///
    /// Tie-breaks are fixed and always end on the release file id so pages
    /// never overlap.
    pub fn order_by(self, direction: SortDirection) -> String {
        let dir = direction.as_sql();
        match self {
            DataSetFileSort::Natural => {
                format!("rf.display_order {dir}, LOWER(rf.name) ASC, rf.id ASC")
            },
            DataSetFileSort::Title => {
                format!("LOWER(rf.name) {dir}, r.published DESC, rf.id ASC")
            },
            DataSetFileSort::Published => {
                format!("r.published {dir}, LOWER(rf.name) ASC, rf.id ASC")
            },
            DataSetFileSort::Relevance => {
                format!("relevance {dir}, r.published DESC, LOWER(rf.name) ASC, rf.id ASC")
            },
        }
    }
}

/// Time period span covered by a data set, e.g. 2018/19 to 2022/23
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimePeriodRange {
    pub start: String,
    pub end: String,
}

/// Descriptive metadata stored alongside a data file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSetFileMeta {
    #[serde(default)]
    pub time_period_range: Option<TimePeriodRange>,
    #[serde(default)]
    pub filters: Vec<String>,
    #[serde(default)]
    pub indicators: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub id: Uuid,
    pub name: String,
    /// Size in bytes
    pub size: i64,
    /// Size for display, e.g. "12 Kb"
    pub display_size: String,
    pub extension: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeInfo {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationInfo {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseInfo {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub release_type: ReleaseType,
    pub is_latest_published_release: bool,
}

/// Public data API data set linked to a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiDataSetInfo {
    pub id: Uuid,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<DateTime<Utc>>,
}

/// One entry in a data set listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSetFileSummary {
    /// Release file id
    pub id: Uuid,
    pub data_set_file_id: Option<Uuid>,
    pub title: String,
    pub content_summary: String,
    pub file: FileInfo,
    pub theme: ThemeInfo,
    pub publication: PublicationInfo,
    pub release: ReleaseInfo,
    /// Whether the file belongs to its publication's latest release
    pub latest_data: bool,
    pub is_superseded: bool,
    pub published: DateTime<Utc>,
    pub geographic_levels: Vec<GeographicLevel>,
    pub time_period_range: Option<TimePeriodRange>,
    pub filters: Vec<String>,
    pub indicators: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api: Option<ApiDataSetInfo>,
}

/// A single data set file with its full context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSetFileDetail {
    #[serde(flatten)]
    pub summary: DataSetFileSummary,
    pub theme_summary: String,
    pub publication_summary: String,
}

/// Columns selected by both the list and the single-file queries, apart
/// from `is_superseded`. Requires the joins in [`DATA_SET_FILE_FROM`].
pub const DATA_SET_FILE_COLUMNS: &str = r#"
    rf.id AS release_file_id,
    rf.name AS title,
    rf.summary AS content_summary,
    rf.api_data_set_id,
    rf.api_data_set_version,
    rf.api_data_set_published,
    f.id AS file_id,
    f.filename,
    f.content_length,
    f.data_set_file_id,
    f.geographic_levels,
    f.meta,
    t.id AS theme_id,
    t.slug AS theme_slug,
    t.title AS theme_title,
    t.summary AS theme_summary,
    p.id AS publication_id,
    p.slug AS publication_slug,
    p.title AS publication_title,
    p.summary AS publication_summary,
    r.id AS release_id,
    r.slug AS release_slug,
    r.title AS release_title,
    r.release_type,
    r.published AS release_published,
    (p.latest_published_release_id IS NOT DISTINCT FROM r.id) AS is_latest_published_release"#;

/// Base relation for data set file queries: only published data files of
/// published releases.
pub const DATA_SET_FILE_FROM: &str = r#"
    FROM release_files rf
    JOIN files f ON f.id = rf.file_id
    JOIN releases r ON r.id = rf.release_id
    JOIN publications p ON p.id = r.publication_id
    JOIN themes t ON t.id = p.theme_id
    LEFT JOIN publications sp ON sp.id = p.superseded_by_id
    WHERE f.file_type = 'data'
      AND rf.published IS NOT NULL
      AND r.published IS NOT NULL"#;

#[derive(Debug, sqlx::FromRow)]
pub struct DataSetFileRow {
    pub release_file_id: Uuid,
    pub title: String,
    pub content_summary: String,
    pub api_data_set_id: Option<Uuid>,
    pub api_data_set_version: Option<String>,
    pub api_data_set_published: Option<DateTime<Utc>>,
    pub file_id: Uuid,
    pub filename: String,
    pub content_length: i64,
    pub data_set_file_id: Option<Uuid>,
    pub geographic_levels: Vec<String>,
    pub meta: Option<Json<DataSetFileMeta>>,
    pub theme_id: Uuid,
    pub theme_slug: String,
    pub theme_title: String,
    pub theme_summary: String,
    pub publication_id: Uuid,
    pub publication_slug: String,
    pub publication_title: String,
    pub publication_summary: String,
    pub release_id: Uuid,
    pub release_slug: String,
    pub release_title: String,
    #[sqlx(try_from = "String")]
    pub release_type: ReleaseType,
    pub release_published: DateTime<Utc>,
    pub is_latest_published_release: bool,
    pub is_superseded: bool,
}

impl DataSetFileRow {
    pub fn into_summary(self) -> DataSetFileSummary {
        self.into_parts().0
    }

    pub fn into_detail(self) -> DataSetFileDetail {
        let (summary, theme_summary, publication_summary) = self.into_parts();
        DataSetFileDetail {
            summary,
            theme_summary,
            publication_summary,
        }
    }

    fn into_parts(self) -> (DataSetFileSummary, String, String) {
        let meta = self.meta.map(|Json(meta)| meta).unwrap_or_default();
        let api = match (self.api_data_set_id, self.api_data_set_version) {
            (Some(id), Some(version)) => Some(ApiDataSetInfo {
                id,
                version,
                published: self.api_data_set_published,
            }),
            _ => None,
        };

        let summary = DataSetFileSummary {
            id: self.release_file_id,
            data_set_file_id: self.data_set_file_id,
            title: self.title,
            content_summary: self.content_summary,
            file: FileInfo {
                id: self.file_id,
                size: self.content_length,
                display_size: display_size(self.content_length),
                extension: file_extension(&self.filename),
                name: self.filename,
            },
            theme: ThemeInfo {
                id: self.theme_id,
                slug: self.theme_slug,
                title: self.theme_title,
            },
            publication: PublicationInfo {
                id: self.publication_id,
                slug: self.publication_slug,
                title: self.publication_title,
            },
            release: ReleaseInfo {
                id: self.release_id,
                slug: self.release_slug,
                title: self.release_title,
                release_type: self.release_type,
                is_latest_published_release: self.is_latest_published_release,
            },
            latest_data: self.is_latest_published_release,
            is_superseded: self.is_superseded,
            published: self.release_published,
            geographic_levels: parse_geographic_levels(&self.geographic_levels),
            time_period_range: meta.time_period_range,
            filters: meta.filters,
            indicators: meta.indicators,
            api,
        };

        (summary, self.theme_summary, self.publication_summary)
    }
}

/// Parse stored level codes, dropping (and logging) any the API does not know
fn parse_geographic_levels(codes: &[String]) -> Vec<GeographicLevel> {
    let mut levels: Vec<GeographicLevel> = codes
        .iter()
        .filter_map(|code| match code.parse() {
            Ok(level) => Some(level),
            Err(e) => {
                tracing::warn!(code = %code, error = %e, "Skipping unknown geographic level");
                None
            },
        })
        .collect();
    levels.sort_by_key(|level| level.label());
    levels.dedup();
    levels
}

fn file_extension(filename: &str) -> String {
    std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default()
}

/// Human readable size using 1024-based units
pub fn display_size(bytes: i64) -> String {
    const UNITS: [&str; 4] = ["Kb", "Mb", "Gb", "Tb"];

    if bytes < 1024 {
        return format!("{} B", bytes.max(0));
    }

    let mut size = bytes as f64 / 1024.0;
    let mut unit = 0;
    loop {
        // Whole units from 100 up, otherwise one decimal place
        let rounded = if size >= 100.0 {
            size.round()
        } else {
            (size * 10.0).round() / 10.0
        };

        if rounded >= 1024.0 && unit < UNITS.len() - 1 {
            size /= 1024.0;
            unit += 1;
            continue;
        }

        return if rounded >= 100.0 || rounded.fract() == 0.0 {
            format!("{:.0} {}", rounded, UNITS[unit])
        } else {
            format!("{:.1} {}", rounded, UNITS[unit])
        };
    }
}
