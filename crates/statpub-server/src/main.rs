//! statpub server entry point

use anyhow::Result;
use statpub_common::logging::{init_logging, LogConfig};
use tracing::info;

use statpub_server::{api, config::Config};

#[tokio::main]
async fn main() -> Result<()> {
    let log_config = LogConfig::for_service("statpub-server").merge_env()?;
    let _guard = init_logging(&log_config)?;

    info!(version = env!("CARGO_PKG_VERSION"), "Starting statpub server");

    let config = Config::load()?;
    info!(
        host = %config.server.host,
        port = config.server.port,
        cache_enabled = config.cache.enabled,
        "Configuration loaded"
    );

    api::serve(config).await
}
