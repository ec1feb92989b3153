use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use std::time::Instant;
use tracing::Instrument;

use pcopp_common::contract::ContractError;

use super::error::ApiError;
use super::AppState;
use crate::config::StalePolicy;

#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub status: &'static str,
}

/// Validates one telemetry document and persists it. Rejections never touch
/// storage.
pub async fn ingest(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<IngestResponse>), ApiError> {
    let start = Instant::now();
    let span = tracing::info_span!("ingest", node_id = tracing::field::Empty);
    let result = admit(&state, &body).instrument(span).await;
    state.metrics.record_ingest_latency(start);
    result
}

async fn admit(state: &AppState, body: &[u8]) -> Result<(StatusCode, Json<IngestResponse>), ApiError> {
    let payload: serde_json::Value = serde_json::from_slice(body).map_err(|e| {
        state.metrics.inc_ingest_rejected();
        ApiError::MalformedJson(e.to_string())
    })?;

    let record = state.validator.check_structure(&payload).map_err(|e| {
        tracing::warn!(error = %e, "telemetry rejected");
        state.metrics.inc_ingest_rejected();
        ApiError::Contract(e)
    })?;
    tracing::Span::current().record("node_id", record.node_id());

    let status = match state.validator.check_freshness(&record, Utc::now()) {
        Ok(()) => {
            state.store.write(&record).await.map_err(|e| {
                tracing::error!(node_id = %record.node_id(), error = %e, "telemetry write failed");
                state.metrics.inc_ingest_errors();
                ApiError::Storage(e)
            })?;
            tracing::info!(
                node_id = %record.node_id(),
                frag = record.memory.mem_frag_index,
                procs_blocked = record.scheduler.procs_blocked,
                "telemetry ingested"
            );
            state.metrics.inc_ingest_accepted();
            "accepted"
        }
        Err(stale @ ContractError::StaleData { .. }) => match state.stale_policy {
            StalePolicy::Reject => {
                tracing::warn!(error = %stale, "telemetry rejected");
                state.metrics.inc_ingest_stale();
                return Err(ApiError::Contract(stale));
            }
            StalePolicy::Archive => {
                state.store.archive(&record).await.map_err(|e| {
                    tracing::error!(node_id = %record.node_id(), error = %e, "telemetry archive failed");
                    state.metrics.inc_ingest_errors();
                    ApiError::Storage(e)
                })?;
                tracing::info!(node_id = %record.node_id(), error = %stale, "stale telemetry archived");
                state.metrics.inc_ingest_archived();
                "archived"
            }
        },
        Err(other) => {
            state.metrics.inc_ingest_rejected();
            return Err(ApiError::Contract(other));
        }
    };

    Ok((StatusCode::OK, Json(IngestResponse { status })))
}
