//! Themes group publications by subject for site navigation.

pub mod queries;
pub mod routes;

pub use queries::{ListThemesError, ListThemesQuery, ThemeWithPublications};
pub use routes::themes_routes;
