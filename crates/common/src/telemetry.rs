use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One host telemetry document, as sent by the agent and accepted by the
/// ingestion boundary. Only constructed by the agent or by
/// [`crate::contract::ContractValidator`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    pub meta: Meta,
    pub memory: Memory,
    pub scheduler: Scheduler,
    pub io: Io,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    pub node_id: String,
    pub timestamp_utc: DateTime<Utc>,
    pub kernel_version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memory {
    pub mem_frag_index: f64,
    pub oom_kill_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scheduler {
    pub load_avg_1m: f64,
    pub procs_blocked: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Io {
    pub dirty_pages_bytes: u64,
}

impl TelemetryRecord {
    pub fn node_id(&self) -> &str {
        &self.meta.node_id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.meta.timestamp_utc
    }

    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TelemetryRecord {
        TelemetryRecord {
            meta: Meta {
                node_id: "550e8400-e29b-41d4-a716-446655440000".into(),
                timestamp_utc: "2026-01-01T12:00:00Z".parse().unwrap(),
                kernel_version: "5.15.0-generic".into(),
            },
            memory: Memory {
                mem_frag_index: 0.45,
                oom_kill_count: 0,
            },
            scheduler: Scheduler {
                load_avg_1m: 1.05,
                procs_blocked: 0,
            },
            io: Io {
                dirty_pages_bytes: 4096,
            },
        }
    }

    #[test]
    fn serializes_nested_groups() {
        let json = sample().to_json().unwrap();
        assert_eq!(json["meta"]["kernel_version"], "5.15.0-generic");
        assert_eq!(json["memory"]["mem_frag_index"], 0.45);
        assert_eq!(json["scheduler"]["load_avg_1m"], 1.05);
        assert_eq!(json["io"]["dirty_pages_bytes"], 4096);
        assert!(json["meta"]["timestamp_utc"]
            .as_str()
            .unwrap()
            .starts_with("2026-01-01T12:00:00"));
    }

    #[test]
    fn accessors() {
        let r = sample();
        assert_eq!(r.node_id(), "550e8400-e29b-41d4-a716-446655440000");
        assert_eq!(r.timestamp().timestamp(), 1_767_268_800);
    }
}
