//! Feature slices implementing the content API
//!
//! Each slice is a vertical cut with its own queries (and commands, where
//! it has any) plus a `routes.rs` that maps HTTP onto them.
//!
//! - **themes**: theme navigation
//! - **publications**: publication listing, detail and titles
//! - **releases**: releases of a publication
//! - **data_set_files**: search and browse published data sets
//! - **cache_admin**: response cache statistics and invalidation
//!
//! Queries and commands implement `mediator::Request` so they can also be
//! dispatched through [`crate::cqrs::build_mediator`].

pub mod cache_admin;
pub mod data_set_files;
pub mod publications;
pub mod releases;
pub mod shared;
pub mod themes;

use axum::Router;
use sqlx::PgPool;

use crate::cache::ContentCache;

/// State shared by every feature route
#[derive(Clone)]
pub struct FeatureState {
    pub db: PgPool,
    pub cache: ContentCache,
}

/// Mount every feature under its path prefix
///
/// - `/themes`
/// - `/publications` (with `/:slug/releases`)
/// - `/data-set-files`
/// - `/cache`
pub fn router(state: FeatureState) -> Router<()> {
    Router::new()
        .nest("/themes", themes::themes_routes())
        .nest("/publications", publications::publications_routes())
        .nest("/data-set-files", data_set_files::data_set_files_routes())
        .nest("/cache", cache_admin::cache_routes())
        .with_state(state)
}
