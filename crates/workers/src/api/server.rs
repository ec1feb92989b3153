use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

use super::{health, metrics};
use crate::metrics::worker_metrics::WorkerMetrics;

pub fn router(worker_metrics: Arc<WorkerMetrics>) -> Router {
    Router::new()
        .route("/healthz", get(health::healthz))
        .route("/ready", get(health::ready))
        .route("/metrics", get(metrics::metrics).with_state(worker_metrics))
}

pub async fn serve<F>(listener: TcpListener, worker_metrics: Arc<WorkerMetrics>, shutdown: F) -> std::io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let app = router(worker_metrics);
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await
}
