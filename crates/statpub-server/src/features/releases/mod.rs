//! Releases of a publication, addressed through the publication's slug.

pub mod queries;
pub mod routes;
pub mod types;

pub use queries::{
    GetLatestReleaseError, GetLatestReleaseQuery, GetReleaseError, GetReleaseQuery,
    ListReleasesError, ListReleasesQuery, ListReleasesResponse,
};
pub use routes::releases_routes;
pub use types::{ReleaseDetail, ReleaseSummary};
