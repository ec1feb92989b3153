use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use std::sync::Arc;

use pcopp_common::exposition::CONTENT_TYPE;

use crate::metrics::exposition::render_prometheus;
use crate::metrics::worker_metrics::WorkerMetrics;

pub async fn metrics(State(m): State<Arc<WorkerMetrics>>) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, CONTENT_TYPE)], render_prometheus(&m))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::State;

    #[tokio::test]
    async fn handler_returns_prometheus() {
        let m = WorkerMetrics::new();
        m.inc_scan_cycles();
        let resp = metrics(State(m)).await.into_response();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("pcopp_worker_scan_cycles_total 1"));
    }
}
