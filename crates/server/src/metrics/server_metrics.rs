use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Default)]
pub struct ServerMetrics {
    ingest_accepted_total: AtomicU64,
    ingest_rejected_total: AtomicU64,
    ingest_stale_total: AtomicU64,
    ingest_archived_total: AtomicU64,
    ingest_errors_total: AtomicU64,
    alert_queries_total: AtomicU64,
    alert_query_errors_total: AtomicU64,
    risk_rows_rejected_total: AtomicU64,
    ingest_latency_sum_us: AtomicU64,
    ingest_latency_count: AtomicU64,
}

impl ServerMetrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_ingest_accepted(&self) {
        self.ingest_accepted_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_ingest_rejected(&self) {
        self.ingest_rejected_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_ingest_stale(&self) {
        self.ingest_stale_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_ingest_archived(&self) {
        self.ingest_archived_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_ingest_errors(&self) {
        self.ingest_errors_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_alert_queries(&self) {
        self.alert_queries_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_alert_query_errors(&self) {
        self.alert_query_errors_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_risk_rows_rejected(&self) {
        self.risk_rows_rejected_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_ingest_latency(&self, start: Instant) {
        let us = start.elapsed().as_micros() as u64;
        self.ingest_latency_sum_us.fetch_add(us, Ordering::Relaxed);
        self.ingest_latency_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn ingest_accepted_total(&self) -> u64 {
        self.ingest_accepted_total.load(Ordering::Relaxed)
    }

    pub fn ingest_rejected_total(&self) -> u64 {
        self.ingest_rejected_total.load(Ordering::Relaxed)
    }

    pub fn ingest_stale_total(&self) -> u64 {
        self.ingest_stale_total.load(Ordering::Relaxed)
    }

    pub fn ingest_archived_total(&self) -> u64 {
        self.ingest_archived_total.load(Ordering::Relaxed)
    }

    pub fn ingest_errors_total(&self) -> u64 {
        self.ingest_errors_total.load(Ordering::Relaxed)
    }

    pub fn alert_queries_total(&self) -> u64 {
        self.alert_queries_total.load(Ordering::Relaxed)
    }

    pub fn alert_query_errors_total(&self) -> u64 {
        self.alert_query_errors_total.load(Ordering::Relaxed)
    }

    pub fn risk_rows_rejected_total(&self) -> u64 {
        self.risk_rows_rejected_total.load(Ordering::Relaxed)
    }

    pub fn ingest_latency_vals(&self) -> (u64, u64) {
        (
            self.ingest_latency_sum_us.load(Ordering::Relaxed),
            self.ingest_latency_count.load(Ordering::Relaxed),
        )
    }
}
