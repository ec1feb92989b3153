use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AgentConfig {
    /// A fresh UUID v4 is generated at startup when unset.
    #[serde(default)]
    pub node_id: Option<String>,
    #[serde(default = "default_ingest_url")]
    pub ingest_url: String,
    #[serde(default = "default_heartbeat")]
    pub heartbeat_seconds: u64,
    #[serde(default = "default_collect_retry")]
    pub collect_retry_seconds: u64,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    #[serde(default = "default_proc_root")]
    pub proc_root: String,
    #[serde(default)]
    pub backoff: BackoffConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BackoffConfig {
    #[serde(default = "default_backoff_base")]
    pub base_seconds: u64,
    #[serde(default = "default_backoff_max")]
    pub max_seconds: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            node_id: None,
            ingest_url: default_ingest_url(),
            heartbeat_seconds: default_heartbeat(),
            collect_retry_seconds: default_collect_retry(),
            request_timeout_seconds: default_request_timeout(),
            proc_root: default_proc_root(),
            backoff: BackoffConfig::default(),
        }
    }
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            base_seconds: default_backoff_base(),
            max_seconds: default_backoff_max(),
        }
    }
}

impl AgentConfig {
    pub fn heartbeat(&self) -> Duration {
        Duration::from_secs(self.heartbeat_seconds)
    }

    pub fn collect_retry(&self) -> Duration {
        Duration::from_secs(self.collect_retry_seconds)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

fn default_ingest_url() -> String {
    "http://localhost:8001/ingest".to_string()
}

fn default_heartbeat() -> u64 {
    5
}

fn default_collect_retry() -> u64 {
    5
}

fn default_request_timeout() -> u64 {
    10
}

fn default_proc_root() -> String {
    "/proc".to_string()
}

fn default_backoff_base() -> u64 {
    1
}

fn default_backoff_max() -> u64 {
    60
}
