use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug)]
pub struct WorkerMetrics {
    scan_cycles: AtomicU64,
    scan_errors: AtomicU64,
    rows_rejected: AtomicU64,
    alerts_delivered: AtomicU64,
    alerts_failed: AtomicU64,
    alerts_suppressed: AtomicU64,
    cycle_latency_sum_us: AtomicU64,
    cycle_latency_count: AtomicU64,
}

impl WorkerMetrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            scan_cycles: AtomicU64::new(0),
            scan_errors: AtomicU64::new(0),
            rows_rejected: AtomicU64::new(0),
            alerts_delivered: AtomicU64::new(0),
            alerts_failed: AtomicU64::new(0),
            alerts_suppressed: AtomicU64::new(0),
            cycle_latency_sum_us: AtomicU64::new(0),
            cycle_latency_count: AtomicU64::new(0),
        })
    }

    pub fn inc_scan_cycles(&self) {
        self.scan_cycles.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_scan_errors(&self) {
        self.scan_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_rows_rejected(&self, count: u64) {
        self.rows_rejected.fetch_add(count, Ordering::Relaxed);
    }

    pub fn add_alerts_delivered(&self, count: u64) {
        self.alerts_delivered.fetch_add(count, Ordering::Relaxed);
    }

    pub fn add_alerts_failed(&self, count: u64) {
        self.alerts_failed.fetch_add(count, Ordering::Relaxed);
    }

    pub fn add_alerts_suppressed(&self, count: u64) {
        self.alerts_suppressed.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_cycle_latency(&self, start: Instant) {
        let us = start.elapsed().as_micros() as u64;
        self.cycle_latency_sum_us.fetch_add(us, Ordering::Relaxed);
        self.cycle_latency_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn scan_cycles_val(&self) -> u64 {
        self.scan_cycles.load(Ordering::Relaxed)
    }

    pub fn scan_errors_val(&self) -> u64 {
        self.scan_errors.load(Ordering::Relaxed)
    }

    pub fn rows_rejected_val(&self) -> u64 {
        self.rows_rejected.load(Ordering::Relaxed)
    }

    pub fn alerts_delivered_val(&self) -> u64 {
        self.alerts_delivered.load(Ordering::Relaxed)
    }

    pub fn alerts_failed_val(&self) -> u64 {
        self.alerts_failed.load(Ordering::Relaxed)
    }

    pub fn alerts_suppressed_val(&self) -> u64 {
        self.alerts_suppressed.load(Ordering::Relaxed)
    }

    pub fn cycle_latency_vals(&self) -> (u64, u64) {
        (
            self.cycle_latency_sum_us.load(Ordering::Relaxed),
            self.cycle_latency_count.load(Ordering::Relaxed),
        )
    }
}
