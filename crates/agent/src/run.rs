use chrono::{DateTime, Utc};
use std::future::Future;
use std::time::Duration;

use pcopp_common::telemetry::{Io, Memory, Meta, Scheduler, TelemetryRecord};

use crate::collector::{kernel_version, KernelSignals, ProcCollector, SignalSource};
use crate::config::AgentConfig;
use crate::exporter::{ExportError, IngestClient, RetryPolicy};

pub fn build_record(node_id: &str, kernel: &str, signals: &KernelSignals, now: DateTime<Utc>) -> TelemetryRecord {
    TelemetryRecord {
        meta: Meta {
            node_id: node_id.to_string(),
            timestamp_utc: now,
            kernel_version: kernel.to_string(),
        },
        memory: Memory {
            mem_frag_index: signals.mem_frag_index,
            oom_kill_count: signals.oom_kill_count,
        },
        scheduler: Scheduler {
            load_avg_1m: signals.load_avg_1m,
            procs_blocked: signals.procs_blocked,
        },
        io: Io {
            dirty_pages_bytes: signals.dirty_pages_bytes,
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Sent,
    CollectFailed,
    ExportFailed,
}

pub struct Agent<S> {
    node_id: String,
    kernel: String,
    source: S,
    client: IngestClient,
    retry: RetryPolicy,
    heartbeat: Duration,
    collect_retry: Duration,
    failures: u32,
}

impl<S: SignalSource> Agent<S> {
    pub fn new(node_id: String, kernel: String, source: S, client: IngestClient, config: &AgentConfig) -> Self {
        Self {
            node_id,
            kernel,
            source,
            client,
            retry: RetryPolicy::from(&config.backoff),
            heartbeat: config.heartbeat(),
            collect_retry: config.collect_retry(),
            failures: 0,
        }
    }

    /// One collect-and-send round. Returns how long to wait before the next.
    pub async fn tick(&mut self) -> (Tick, Duration) {
        let signals = match self.source.collect() {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read kernel signals");
                return (Tick::CollectFailed, self.collect_retry);
            }
        };

        tracing::debug!(
            frag = signals.mem_frag_index,
            procs_blocked = signals.procs_blocked,
            load_avg_1m = signals.load_avg_1m,
            dirty_pages_bytes = signals.dirty_pages_bytes,
            "signals collected"
        );

        let record = build_record(&self.node_id, &self.kernel, &signals, Utc::now());
        match self.client.send(&record).await {
            Ok(status) => {
                tracing::info!(node_id = %self.node_id, status = status.as_u16(), "telemetry sent");
                self.failures = 0;
                (Tick::Sent, self.heartbeat)
            }
            Err(e) => {
                let delay = self.retry.delay_for_attempt(self.failures);
                self.failures = self.failures.saturating_add(1);
                match &e {
                    ExportError::Rejected { status, .. } => {
                        tracing::warn!(status = status.as_u16(), error = %e, backoff_ms = delay.as_millis() as u64, "server rejected telemetry")
                    }
                    ExportError::Transport(_) => {
                        tracing::warn!(error = %e, backoff_ms = delay.as_millis() as u64, "connection failed")
                    }
                }
                (Tick::ExportFailed, delay)
            }
        }
    }

    pub async fn run<F>(&mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        loop {
            let (_, wait) = self.tick().await;
            tokio::select! {
                _ = &mut shutdown => return,
                _ = tokio::time::sleep(wait) => {}
            }
        }
    }
}

pub async fn run(config: AgentConfig) -> anyhow::Result<()> {
    let node_id = config
        .node_id
        .clone()
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let kernel = kernel_version();
    let client = IngestClient::new(config.ingest_url.clone(), config.request_timeout())?;

    tracing::info!(
        node_id = %node_id,
        kernel_version = %kernel,
        ingest_url = %client.url(),
        heartbeat_s = config.heartbeat_seconds,
        "agent configured"
    );

    let source = ProcCollector::new(config.proc_root.clone());
    let mut agent = Agent::new(node_id, kernel, source, client, &config);
    agent.run(pcopp_common::shutdown::wait_for_shutdown()).await;

    tracing::info!("agent stopped");
    Ok(())
}
