//! Mediator wiring for every query and command handler

pub use mediator::DefaultAsyncMediator;
use sqlx::PgPool;

use crate::cache::ContentCache;

pub mod middleware;

pub type AppMediator = DefaultAsyncMediator;

pub fn build_mediator(pool: PgPool, cache: ContentCache) -> AppMediator {
    DefaultAsyncMediator::builder()
        // Themes
        .add_handler({
            let pool = pool.clone();
            let cache = cache.clone();
            move |query| {
                let pool = pool.clone();
                let cache = cache.clone();
                async move { crate::features::themes::queries::list::handle(pool, cache, query).await }
            }
        })
        // Publications
        .add_handler({
            let pool = pool.clone();
            let cache = cache.clone();
            move |query| {
                let pool = pool.clone();
                let cache = cache.clone();
                async move {
                    crate::features::publications::queries::list::handle(pool, cache, query).await
                }
            }
        })
        .add_handler({
            let pool = pool.clone();
            move |query| {
                let pool = pool.clone();
                async move { crate::features::publications::queries::get::handle(pool, query).await }
            }
        })
        .add_handler({
            let pool = pool.clone();
            move |query| {
                let pool = pool.clone();
                async move {
                    crate::features::publications::queries::get_title::handle(pool, query).await
                }
            }
        })
        // Releases
        .add_handler({
            let pool = pool.clone();
            move |query| {
                let pool = pool.clone();
                async move { crate::features::releases::queries::list::handle(pool, query).await }
            }
        })
        .add_handler({
            let pool = pool.clone();
            move |query| {
                let pool = pool.clone();
                async move { crate::features::releases::queries::get::handle(pool, query).await }
            }
        })
        .add_handler({
            let pool = pool.clone();
            move |query| {
                let pool = pool.clone();
                async move { crate::features::releases::queries::get_latest::handle(pool, query).await }
            }
        })
        // Data set files
        .add_handler({
            let pool = pool.clone();
            let cache = cache.clone();
            move |query| {
                let pool = pool.clone();
                let cache = cache.clone();
                async move {
                    crate::features::data_set_files::queries::list::handle(pool, cache, query).await
                }
            }
        })
        .add_handler({
            let pool = pool.clone();
            move |query| {
                let pool = pool.clone();
                async move { crate::features::data_set_files::queries::get::handle(pool, query).await }
            }
        })
        // Cache administration
        .add_handler({
            let cache = cache.clone();
            move |query| {
                let cache = cache.clone();
                async move { crate::features::cache_admin::queries::stats::handle(cache, query).await }
            }
        })
        .add_handler({
            let cache = cache.clone();
            move |command| {
                let cache = cache.clone();
                async move {
                    crate::features::cache_admin::commands::clear::handle(cache, command).await
                }
            }
        })
        .build()
}
