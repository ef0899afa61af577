//! DocPortal server: role-gated document portal.
//!
//! Loads configuration, initializes logging, connects to PostgreSQL, and
//! serves the HTTP API until shutdown.

use anyhow::Context;
use tracing_subscriber::{EnvFilter, fmt};

use docportal_core::config::AppConfig;
use docportal_database::connection::DatabasePool;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = std::env::var("DOCPORTAL_ENV").unwrap_or_else(|_| "development".to_string());
    let config = AppConfig::load(&env).context("failed to load configuration")?;

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    let pool = DatabasePool::connect(&config.database)
        .await
        .context("failed to connect to the database")?;

    docportal_api::run_server(config, pool.into_pool())
        .await
        .context("server terminated with an error")?;

    Ok(())
}

/// Initialize tracing. `RUST_LOG` overrides the configured level.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}
