//! Domain vocabulary shared across statpub
//!
//! These enums appear in query strings, JSON payloads and database columns.
//! Each has a single canonical string form used in all three places.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::StatpubError;

// ============================================================================
// Release Types
// ============================================================================

/// Classification of a statistical release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseType {
    AccreditedOfficialStatistics,
    OfficialStatistics,
    OfficialStatisticsInDevelopment,
    ExperimentalStatistics,
    AdHocStatistics,
    ManagementInformation,
}

impl ReleaseType {
    /// All release types in display order
    pub const ALL: [ReleaseType; 6] = [
        ReleaseType::AccreditedOfficialStatistics,
        ReleaseType::OfficialStatistics,
        ReleaseType::OfficialStatisticsInDevelopment,
        ReleaseType::ExperimentalStatistics,
        ReleaseType::AdHocStatistics,
        ReleaseType::ManagementInformation,
    ];

    /// Canonical string form, as stored in the database
    pub fn as_str(self) -> &'static str {
        match self {
            ReleaseType::AccreditedOfficialStatistics => "accredited_official_statistics",
            ReleaseType::OfficialStatistics => "official_statistics",
            ReleaseType::OfficialStatisticsInDevelopment => "official_statistics_in_development",
            ReleaseType::ExperimentalStatistics => "experimental_statistics",
            ReleaseType::AdHocStatistics => "ad_hoc_statistics",
            ReleaseType::ManagementInformation => "management_information",
        }
    }

    /// Human readable title
    pub fn title(self) -> &'static str {
        match self {
            ReleaseType::AccreditedOfficialStatistics => "Accredited official statistics",
            ReleaseType::OfficialStatistics => "Official statistics",
            ReleaseType::OfficialStatisticsInDevelopment => "Official statistics in development",
            ReleaseType::ExperimentalStatistics => "Experimental statistics",
            ReleaseType::AdHocStatistics => "Ad hoc statistics",
            ReleaseType::ManagementInformation => "Management information",
        }
    }
}

impl FromStr for ReleaseType {
    type Err = StatpubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReleaseType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| StatpubError::UnknownReleaseType(s.to_string()))
    }
}

impl TryFrom<String> for ReleaseType {
    type Error = StatpubError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Geographic Levels
// ============================================================================

/// Geographic granularity at which a data set reports figures.
///
/// Serialized using the short level code (`NAT`, `LA`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GeographicLevel {
    #[serde(rename = "CTRY")]
    Country,
    #[serde(rename = "EDA")]
    EnglishDevolvedArea,
    #[serde(rename = "INST")]
    Institution,
    #[serde(rename = "LA")]
    LocalAuthority,
    #[serde(rename = "LAD")]
    LocalAuthorityDistrict,
    #[serde(rename = "LEP")]
    LocalEnterprisePartnership,
    #[serde(rename = "LSIP")]
    LocalSkillsImprovementPlanArea,
    #[serde(rename = "MCA")]
    MayoralCombinedAuthority,
    #[serde(rename = "MAT")]
    MultiAcademyTrust,
    #[serde(rename = "NAT")]
    National,
    #[serde(rename = "OA")]
    OpportunityArea,
    #[serde(rename = "PCON")]
    ParliamentaryConstituency,
    #[serde(rename = "PA")]
    PlanningArea,
    #[serde(rename = "PROV")]
    Provider,
    #[serde(rename = "REG")]
    Region,
    #[serde(rename = "RSC")]
    RscRegion,
    #[serde(rename = "SCH")]
    School,
    #[serde(rename = "SPON")]
    Sponsor,
    #[serde(rename = "WARD")]
    Ward,
}

impl GeographicLevel {
    pub const ALL: [GeographicLevel; 19] = [
        GeographicLevel::Country,
        GeographicLevel::EnglishDevolvedArea,
        GeographicLevel::Institution,
        GeographicLevel::LocalAuthority,
        GeographicLevel::LocalAuthorityDistrict,
        GeographicLevel::LocalEnterprisePartnership,
        GeographicLevel::LocalSkillsImprovementPlanArea,
        GeographicLevel::MayoralCombinedAuthority,
        GeographicLevel::MultiAcademyTrust,
        GeographicLevel::National,
        GeographicLevel::OpportunityArea,
        GeographicLevel::ParliamentaryConstituency,
        GeographicLevel::PlanningArea,
        GeographicLevel::Provider,
        GeographicLevel::Region,
        GeographicLevel::RscRegion,
        GeographicLevel::School,
        GeographicLevel::Sponsor,
        GeographicLevel::Ward,
    ];

    /// Short level code
    pub fn code(self) -> &'static str {
        match self {
            GeographicLevel::Country => "CTRY",
            GeographicLevel::EnglishDevolvedArea => "EDA",
            GeographicLevel::Institution => "INST",
            GeographicLevel::LocalAuthority => "LA",
            GeographicLevel::LocalAuthorityDistrict => "LAD",
            GeographicLevel::LocalEnterprisePartnership => "LEP",
            GeographicLevel::LocalSkillsImprovementPlanArea => "LSIP",
            GeographicLevel::MayoralCombinedAuthority => "MCA",
            GeographicLevel::MultiAcademyTrust => "MAT",
            GeographicLevel::National => "NAT",
            GeographicLevel::OpportunityArea => "OA",
            GeographicLevel::ParliamentaryConstituency => "PCON",
            GeographicLevel::PlanningArea => "PA",
            GeographicLevel::Provider => "PROV",
            GeographicLevel::Region => "REG",
            GeographicLevel::RscRegion => "RSC",
            GeographicLevel::School => "SCH",
            GeographicLevel::Sponsor => "SPON",
            GeographicLevel::Ward => "WARD",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GeographicLevel::Country => "Country",
            GeographicLevel::EnglishDevolvedArea => "English devolved area",
            GeographicLevel::Institution => "Institution",
            GeographicLevel::LocalAuthority => "Local authority",
            GeographicLevel::LocalAuthorityDistrict => "Local authority district",
            GeographicLevel::LocalEnterprisePartnership => "Local enterprise partnership",
            GeographicLevel::LocalSkillsImprovementPlanArea => {
                "Local skills improvement plan area"
            },
            GeographicLevel::MayoralCombinedAuthority => "Mayoral combined authority",
            GeographicLevel::MultiAcademyTrust => "Multi-academy trust",
            GeographicLevel::National => "National",
            GeographicLevel::OpportunityArea => "Opportunity area",
            GeographicLevel::ParliamentaryConstituency => "Parliamentary constituency",
            GeographicLevel::PlanningArea => "Planning area",
            GeographicLevel::Provider => "Provider",
            GeographicLevel::Region => "Region",
            GeographicLevel::RscRegion => "RSC region",
            GeographicLevel::School => "School",
            GeographicLevel::Sponsor => "Sponsor",
            GeographicLevel::Ward => "Ward",
        }
    }
}

impl FromStr for GeographicLevel {
    type Err = StatpubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GeographicLevel::ALL
            .into_iter()
            .find(|level| level.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| StatpubError::UnknownGeographicLevel(s.to_string()))
    }
}

impl std::fmt::Display for GeographicLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

// ============================================================================
// Sorting
// ============================================================================

/// Direction applied to a sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// SQL keyword for ORDER BY clauses
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    pub fn reverse(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl FromStr for SortDirection {
    type Err = StatpubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            _ => Err(StatpubError::InvalidSortDirection(s.to_string())),
        }
    }
}
