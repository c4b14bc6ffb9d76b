pub mod get;
pub mod get_latest;
pub mod list;

pub use get::{GetReleaseError, GetReleaseQuery};
pub use get_latest::{GetLatestReleaseError, GetLatestReleaseQuery};
pub use list::{ListReleasesError, ListReleasesQuery, ListReleasesResponse};
