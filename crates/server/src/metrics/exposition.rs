use pcopp_common::exposition::Exposition;

use super::server_metrics::ServerMetrics;

pub fn render_prometheus(m: &ServerMetrics) -> String {
    Exposition::new()
        .counter("pcopp_ingest_accepted_total", "Telemetry records written to storage.", m.ingest_accepted_total())
        .counter("pcopp_ingest_rejected_total", "Documents refused before storage.", m.ingest_rejected_total())
        .counter("pcopp_ingest_stale_total", "Records refused as stale.", m.ingest_stale_total())
        .counter("pcopp_ingest_archived_total", "Stale records diverted to the archive table.", m.ingest_archived_total())
        .counter("pcopp_ingest_errors_total", "Ingest requests that failed in storage.", m.ingest_errors_total())
        .counter("pcopp_alert_queries_total", "Active alert queries served.", m.alert_queries_total())
        .counter("pcopp_alert_query_errors_total", "Active alert queries that failed.", m.alert_query_errors_total())
        .counter("pcopp_risk_rows_rejected_total", "Risk view rows skipped for invalid scores.", m.risk_rows_rejected_total())
        .summary("pcopp_ingest_latency_us", "Ingest handling time in microseconds.", m.ingest_latency_vals())
        .finish()
}
