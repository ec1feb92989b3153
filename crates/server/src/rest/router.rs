use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

use pcopp_common::contract::ContractValidator;
use pcopp_common::policy::PolicyEngine;
use pcopp_common::store::{RiskSource, TelemetryStore};

use super::{alerts, health, ingest, metrics};
use crate::config::StalePolicy;
use crate::metrics::server_metrics::ServerMetrics;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TelemetryStore>,
    pub risks: Arc<dyn RiskSource>,
    pub validator: ContractValidator,
    pub policy: PolicyEngine,
    pub stale_policy: StalePolicy,
    pub metrics: Arc<ServerMetrics>,
}

impl AppState {
    pub fn new(store: Arc<dyn TelemetryStore>, risks: Arc<dyn RiskSource>) -> Self {
        Self {
            store,
            risks,
            validator: ContractValidator::default(),
            policy: PolicyEngine::new(),
            stale_policy: StalePolicy::default(),
            metrics: ServerMetrics::new(),
        }
    }

    pub fn with_validator(mut self, validator: ContractValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_stale_policy(mut self, stale_policy: StalePolicy) -> Self {
        self.stale_policy = stale_policy;
        self
    }
}

pub fn router(state: AppState) -> Router {
    let metrics_state = state.metrics.clone();
    Router::new()
        .route("/healthz", get(health::healthz))
        .route("/ready", get(health::ready))
        .route("/metrics", get(metrics::metrics).with_state(metrics_state))
        .route("/ingest", post(ingest::ingest))
        .route("/alerts/active", get(alerts::active))
        .with_state(state)
}
