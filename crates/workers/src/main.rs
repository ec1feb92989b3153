use std::sync::Arc;

use anyhow::Context;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use pcopp_common::policy::PolicyEngine;
use pcopp_common::shutdown::wait_for_shutdown;
use pcopp_common::store::{create_pool, PgRiskSource};
use pcopp_workers::api;
use pcopp_workers::config::WorkerConfig;
use pcopp_workers::dispatch::AlertDispatcher;
use pcopp_workers::metrics::worker_metrics::WorkerMetrics;
use pcopp_workers::notifier::{PagerDutySink, RoutingSink, SlackSink};
use pcopp_workers::scanner::RiskScanner;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .init();

    let config = WorkerConfig::from_env().context("invalid worker configuration")?;
    let worker_metrics = WorkerMetrics::new();

    let pool = create_pool(&config.database_url, config.db_max_connections)
        .await
        .context("failed to connect to database")?;

    let mut sink = RoutingSink::new();
    match &config.slack_webhook_url {
        Some(url) => {
            let slack = SlackSink::new(url.clone(), config.notify_timeout).context("failed to build Slack client")?;
            sink = sink.with_slack(Arc::new(slack));
        }
        None => tracing::warn!("SLACK_WEBHOOK_URL not set, SLACK_LOG alerts go to the log"),
    }
    match &config.pagerduty_routing_key {
        Some(key) => {
            let pagerduty = PagerDutySink::new(config.pagerduty_events_url.clone(), key.clone(), config.notify_timeout)
                .context("failed to build PagerDuty client")?;
            sink = sink.with_pagerduty(Arc::new(pagerduty));
        }
        None => tracing::warn!("PAGERDUTY_ROUTING_KEY not set, PAGERDUTY_TRIGGER alerts go to the log"),
    }

    let scanner = RiskScanner::new(
        Arc::new(PgRiskSource::new(pool)),
        PolicyEngine::new(),
        AlertDispatcher::new(Arc::new(sink)),
        worker_metrics.clone(),
        config.scan_interval,
    );

    let (stop_tx, stop_rx) = watch::channel(false);

    let listener = tokio::net::TcpListener::bind(config.api_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.api_addr))?;
    tracing::info!(addr = %config.api_addr, "worker API server starting");
    let api_handle = tokio::spawn(api::serve(listener, worker_metrics, stopped(stop_rx.clone())));

    tracing::info!(interval_secs = config.scan_interval.as_secs(), "risk scanner starting");
    let scanner_handle = tokio::spawn(async move { scanner.run(stopped(stop_rx)).await });

    wait_for_shutdown().await;
    tracing::info!("shutdown requested");
    let _ = stop_tx.send(true);

    match api_handle.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::error!("API: {e}"),
        Err(e) => tracing::error!("API join: {e}"),
    }
    if let Err(e) = scanner_handle.await {
        tracing::error!("scanner join: {e}");
    }

    Ok(())
}

async fn stopped(mut rx: watch::Receiver<bool>) {
    let _ = rx.wait_for(|stop| *stop).await;
}
