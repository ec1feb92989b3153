use chrono::Utc;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;
use tracing::Instrument;

use pcopp_common::policy::PolicyEngine;
use pcopp_common::risk::RiskCandidate;
use pcopp_common::store::{RiskSource, StorageError};

use crate::dispatch::{AlertDispatcher, DispatchReport};
use crate::metrics::worker_metrics::WorkerMetrics;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    pub candidates: usize,
    pub rejected: usize,
    pub report: DispatchReport,
}

/// Periodically reads the risk views, applies the policy and hands the
/// decisions to the dispatcher.
pub struct RiskScanner {
    risks: Arc<dyn RiskSource>,
    policy: PolicyEngine,
    dispatcher: AlertDispatcher,
    metrics: Arc<WorkerMetrics>,
    interval: Duration,
}

impl RiskScanner {
    pub fn new(
        risks: Arc<dyn RiskSource>,
        policy: PolicyEngine,
        dispatcher: AlertDispatcher,
        metrics: Arc<WorkerMetrics>,
        interval: Duration,
    ) -> Self {
        Self {
            risks,
            policy,
            dispatcher,
            metrics,
            interval,
        }
    }

    /// A data-source failure aborts the cycle before anything is dispatched.
    pub async fn scan_once(&self) -> Result<ScanOutcome, StorageError> {
        let start = Instant::now();
        self.metrics.inc_scan_cycles();

        let rows = match self.risks.fetch_all().await {
            Ok(rows) => rows,
            Err(e) => {
                self.metrics.inc_scan_errors();
                self.metrics.record_cycle_latency(start);
                return Err(e);
            }
        };

        let mut rejected = 0usize;
        let mut pairs = Vec::with_capacity(rows.len());
        for (view, row) in rows {
            let node_id = row.node_id.clone();
            match RiskCandidate::from_row(view, row) {
                Ok(candidate) => {
                    let action = self.policy.decide(&candidate);
                    pairs.push((candidate, action));
                }
                Err(e) => {
                    tracing::warn!(view = view.relation(), %node_id, error = %e, "risk row rejected");
                    rejected += 1;
                }
            }
        }

        let candidates = pairs.len();
        let report = self.dispatcher.dispatch(pairs, Utc::now()).await;

        self.metrics.add_rows_rejected(rejected as u64);
        self.metrics.add_alerts_delivered(report.delivered as u64);
        self.metrics.add_alerts_failed(report.failed as u64);
        self.metrics.add_alerts_suppressed(report.suppressed as u64);
        self.metrics.record_cycle_latency(start);

        Ok(ScanOutcome {
            candidates,
            rejected,
            report,
        })
    }

    /// Runs cycles until `shutdown` resolves. Ticks missed during a slow cycle
    /// are skipped rather than replayed.
    pub async fn run<F>(&self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        let mut cycle: u64 = 0;
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("scanner stopping");
                    return;
                }
                _ = ticker.tick() => {
                    cycle += 1;
                    let span = tracing::info_span!("scan_cycle", cycle);
                    match self.scan_once().instrument(span.clone()).await {
                        Ok(outcome) => span.in_scope(|| {
                            tracing::info!(
                                candidates = outcome.candidates,
                                rejected = outcome.rejected,
                                delivered = outcome.report.delivered,
                                failed = outcome.report.failed,
                                suppressed = outcome.report.suppressed,
                                "scan cycle complete"
                            )
                        }),
                        Err(e) => span.in_scope(|| tracing::error!(error = %e, "scan cycle aborted")),
                    }
                }
            }
        }
    }
}
