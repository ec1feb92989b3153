use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pcopp_agent::cli::Args;
use pcopp_agent::config::{self, AgentConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .init();

    let args = Args::parse();
    let mut cfg = match &args.config {
        Some(path) => config::load_from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => AgentConfig::default(),
    };
    if let Some(url) = args.ingest_url {
        cfg.ingest_url = url;
    }
    if let Some(id) = args.node_id {
        cfg.node_id = Some(id);
    }
    config::validate(&cfg).context("invalid agent configuration")?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "pcopp agent starting");
    pcopp_agent::run::run(cfg).await
}
