//! Database pool setup and shared SQL fragments

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use thiserror::Error;

use crate::config::DatabaseConfig;

/// Database operation errors with contextual information
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database query failed: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Database migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Database configuration error: {0}. Check DATABASE_URL and connection settings.")]
    Config(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// Joins every content query needs to decide whether a publication has been
/// superseded: `p` is the publication, `sp` its (optional) successor.
pub const SUPERSEDING_PUBLICATION_JOIN: &str =
    "LEFT JOIN publications sp ON sp.id = p.superseded_by_id";

/// A publication only counts as superseded once its successor has a
/// published release. Requires [`SUPERSEDING_PUBLICATION_JOIN`].
pub const NOT_SUPERSEDED: &str = "(sp.id IS NULL OR sp.latest_published_release_id IS NULL)";

/// Expression evaluating to whether `p` is superseded. Requires
/// [`SUPERSEDING_PUBLICATION_JOIN`].
pub const IS_SUPERSEDED: &str = "(sp.id IS NOT NULL AND sp.latest_published_release_id IS NOT NULL)";

pub async fn create_pool(config: &DatabaseConfig) -> DbResult<PgPool> {
    if config.url.is_empty() {
        return Err(DbError::Config("DATABASE_URL is empty".to_string()));
    }

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .connect(&config.url)
        .await?;

    tracing::info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "Database connection pool created"
    );

    Ok(pool)
}

/// Apply pending migrations from the workspace `migrations/` directory
pub async fn run_migrations(pool: &PgPool) -> DbResult<()> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    tracing::info!("Database migrations completed");
    Ok(())
}

pub async fn health_check(pool: &PgPool) -> DbResult<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map(|_| ())
        .map_err(DbError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_pool_rejects_empty_url() {
        let config = DatabaseConfig {
            url: String::new(),
            max_connections: 1,
            min_connections: 0,
            connect_timeout_secs: 1,
            idle_timeout_secs: 1,
        };
        assert!(matches!(create_pool(&config).await, Err(DbError::Config(_))));
    }

    #[test]
    fn test_supersession_fragments_are_complementary() {
        assert!(NOT_SUPERSEDED.contains("sp.id IS NULL"));
        assert!(IS_SUPERSEDED.contains("sp.id IS NOT NULL"));
        assert!(SUPERSEDING_PUBLICATION_JOIN.contains("p.superseded_by_id"));
    }
}
