use pcopp_common::exposition::Exposition;

use super::worker_metrics::WorkerMetrics;

pub fn render_prometheus(m: &WorkerMetrics) -> String {
    Exposition::new()
        .counter("pcopp_worker_scan_cycles_total", "Scan cycles completed.", m.scan_cycles_val())
        .counter("pcopp_worker_scan_errors_total", "Scan cycles aborted.", m.scan_errors_val())
        .counter("pcopp_worker_rows_rejected_total", "Risk view rows skipped for invalid scores.", m.rows_rejected_val())
        .counter("pcopp_worker_alerts_delivered_total", "Alerts accepted by a sink.", m.alerts_delivered_val())
        .counter("pcopp_worker_alerts_failed_total", "Alert deliveries that failed.", m.alerts_failed_val())
        .counter("pcopp_worker_alerts_suppressed_total", "Alerts dropped before delivery.", m.alerts_suppressed_val())
        .summary("pcopp_worker_cycle_latency_us", "Scan cycle duration in microseconds.", m.cycle_latency_vals())
        .finish()
}
