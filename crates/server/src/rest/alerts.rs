use axum::extract::State;
use axum::Json;

use pcopp_common::alert::{active_alerts, ActiveAlert};
use pcopp_common::risk::RiskCandidate;

use super::error::ApiError;
use super::AppState;

/// Evaluates the current risk views through the policy on every request.
pub async fn active(State(state): State<AppState>) -> Result<Json<Vec<ActiveAlert>>, ApiError> {
    state.metrics.inc_alert_queries();

    let rows = state.risks.fetch_all().await.map_err(|e| {
        tracing::error!(error = %e, "risk view query failed");
        state.metrics.inc_alert_query_errors();
        ApiError::RiskDataUnavailable(e)
    })?;

    let candidates = rows.into_iter().filter_map(|(view, row)| {
        let node_id = row.node_id.clone();
        match RiskCandidate::from_row(view, row) {
            Ok(c) => Some(c),
            Err(e) => {
                tracing::warn!(view = view.relation(), %node_id, error = %e, "risk row rejected");
                state.metrics.inc_risk_rows_rejected();
                None
            }
        }
    });

    Ok(Json(active_alerts(&state.policy, candidates)))
}
