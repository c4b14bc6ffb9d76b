pub mod list;

pub use list::{ListThemesError, ListThemesQuery, ThemePublication, ThemeWithPublications};
