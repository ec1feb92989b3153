use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use std::sync::Arc;

use pcopp_common::exposition::CONTENT_TYPE;

use crate::metrics::exposition::render_prometheus;
use crate::metrics::server_metrics::ServerMetrics;

pub async fn metrics(State(m): State<Arc<ServerMetrics>>) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, CONTENT_TYPE)], render_prometheus(&m))
}
