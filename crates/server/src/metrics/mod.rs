pub mod exposition;
pub mod server_metrics;

#[cfg(test)]
mod tests {
    use super::exposition::render_prometheus;
    use super::server_metrics::ServerMetrics;

    #[test]
    fn prometheus_contains_all_counters() {
        let m = ServerMetrics::new();
        m.inc_ingest_accepted();
        m.inc_ingest_rejected();
        m.inc_alert_queries();
        let output = render_prometheus(&m);
        assert!(output.contains("pcopp_ingest_accepted_total 1"));
        assert!(output.contains("pcopp_ingest_rejected_total 1"));
        assert!(output.contains("pcopp_alert_queries_total 1"));
        assert!(output.contains("pcopp_ingest_stale_total 0"));
    }
}
