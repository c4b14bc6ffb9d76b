//! HTTP surface: router assembly, health check and server lifecycle

pub mod response;

use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;
use sqlx::PgPool;
use std::{net::SocketAddr, time::Duration};
use tokio::signal;
use tracing::info;

use crate::cache::{self, ContentCache};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::{db, features, middleware};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub cache: ContentCache,
}

/// Build the full application router with middleware applied
pub fn create_router(state: AppState, config: &Config) -> Router {
    let feature_state = features::FeatureState {
        db: state.db.clone(),
        cache: state.cache.clone(),
    };

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .with_state(state)
        .nest("/api/v1", features::router(feature_state))
        .layer(middleware::compression_layer())
        .layer(middleware::tracing_layer())
        .layer(middleware::cors_layer(&config.cors))
}

/// Connect, migrate and serve until a shutdown signal arrives
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let pool = db::create_pool(&config.database).await?;
    db::run_migrations(&pool).await?;

    let cache = ContentCache::new(config.cache.clone());
    let purge_task = config.cache.enabled.then(|| {
        cache::spawn_purge_task(
            cache.clone(),
            Duration::from_secs(config.cache.purge_interval_secs.max(1)),
        )
    });
    info!(cache = ?cache, "Response cache initialized");

    let app = create_router(AppState { db: pool, cache }, &config);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(config.server.shutdown_timeout_secs))
        .await?;

    if let Some(handle) = purge_task {
        handle.abort();
    }

    info!("Server shut down gracefully");
    Ok(())
}

async fn root() -> impl IntoResponse {
    Json(json!({
        "name": "statpub content API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}

async fn health(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    db::health_check(&state.db).await.map_err(|e| {
        tracing::error!(error = %e, "Database health check failed");
        AppError::Unavailable("Database is unreachable".to_string())
    })?;

    Ok(Json(json!({
        "status": "healthy",
        "database": "connected"
    })))
}

async fn shutdown_signal(timeout_secs: u64) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting graceful shutdown"),
        _ = terminate => info!("Received terminate signal, starting graceful shutdown"),
    }

    info!(timeout_secs, "Waiting for connections to close");
    tokio::time::sleep(Duration::from_secs(timeout_secs.min(5))).await;
}
