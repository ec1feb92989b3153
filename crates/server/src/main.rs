use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use pcopp_common::contract::ContractValidator;
use pcopp_common::shutdown::wait_for_shutdown;
use pcopp_common::store::{self, migrator, PgRiskSource, PgTelemetryStore};
use pcopp_server::config::ServerConfig;
use pcopp_server::rest::{self, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .init();

    let config = ServerConfig::from_env().context("invalid server configuration")?;

    let pool = store::create_pool(&config.database_url, config.db_max_connections)
        .await
        .context("failed to connect to database")?;
    if config.run_migrations {
        let applied = migrator::run_migrations(&pool).await.context("migrations failed")?;
        tracing::info!(applied = applied.len(), "migrations complete");
    }

    let state = AppState::new(
        Arc::new(PgTelemetryStore::new(pool.clone())),
        Arc::new(PgRiskSource::new(pool)),
    )
        .with_validator(ContractValidator::with_max_age_secs(config.max_telemetry_age_secs))
        .with_stale_policy(config.stale_policy);
    let app = rest::router(state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, stale_policy = ?config.stale_policy, "ingestion API starting");

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown())
        .await
        .context("server error")?;

    tracing::info!("ingestion API stopped");
    Ok(())
}
