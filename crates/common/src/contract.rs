//! Admission gate for inbound telemetry.
//!
//! Validation runs in two ordered stages: the structural contract first, then
//! the freshness rule. A payload that fails the contract is never time-checked.

use chrono::{DateTime, TimeDelta, Utc};
use serde_json::Value;

use crate::telemetry::{Io, Meta, Memory, Scheduler, TelemetryRecord};

pub const DEFAULT_MAX_AGE_SECS: u64 = 300;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ContractError {
    #[error("contract violation at {field}: {reason} (got {value})")]
    ContractViolation {
        field: String,
        value: String,
        reason: String,
    },

    #[error("data too stale: node {node_id} reported {age_secs}s ago (limit {max_age_secs}s)")]
    StaleData {
        node_id: String,
        age_secs: i64,
        max_age_secs: i64,
    },
}

impl ContractError {
    fn violation(field: &str, value: Option<&Value>, reason: &str) -> Self {
        Self::ContractViolation {
            field: field.to_string(),
            value: value.map_or_else(|| "<missing>".to_string(), Value::to_string),
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ContractValidator {
    max_age: TimeDelta,
}

impl Default for ContractValidator {
    fn default() -> Self {
        Self::with_max_age_secs(DEFAULT_MAX_AGE_SECS)
    }
}

impl ContractValidator {
    pub fn with_max_age_secs(secs: u64) -> Self {
        let secs = i64::try_from(secs).unwrap_or(i64::MAX);
        Self {
            max_age: TimeDelta::try_seconds(secs).unwrap_or(TimeDelta::MAX),
        }
    }

    pub fn max_age(&self) -> TimeDelta {
        self.max_age
    }

    pub fn validate(&self, payload: &Value, now: DateTime<Utc>) -> Result<TelemetryRecord, ContractError> {
        let record = self.check_structure(payload)?;
        self.check_freshness(&record, now)?;
        Ok(record)
    }

    /// Checks required fields, types and numeric ranges, reporting the first
    /// violation in document order.
    pub fn check_structure(&self, payload: &Value) -> Result<TelemetryRecord, ContractError> {
        if !payload.is_object() {
            return Err(ContractError::violation("$", Some(payload), "document must be an object"));
        }

        let meta = group(payload, "meta")?;
        let memory = group(payload, "memory")?;
        let scheduler = group(payload, "scheduler")?;
        let io = group(payload, "io")?;

        Ok(TelemetryRecord {
            meta: Meta {
                node_id: text(meta, "meta.node_id")?,
                timestamp_utc: timestamp(meta, "meta.timestamp_utc")?,
                kernel_version: text(meta, "meta.kernel_version")?,
            },
            memory: Memory {
                mem_frag_index: fraction(memory, "memory.mem_frag_index")?,
                oom_kill_count: counter(memory, "memory.oom_kill_count")?,
            },
            scheduler: Scheduler {
                load_avg_1m: non_negative(scheduler, "scheduler.load_avg_1m")?,
                procs_blocked: counter(scheduler, "scheduler.procs_blocked")?,
            },
            io: Io {
                dirty_pages_bytes: counter(io, "io.dirty_pages_bytes")?,
            },
        })
    }

    /// Future timestamps are accepted; only records older than the limit fail.
    pub fn check_freshness(&self, record: &TelemetryRecord, now: DateTime<Utc>) -> Result<(), ContractError> {
        let age = now.signed_duration_since(record.timestamp());
        if age > self.max_age {
            return Err(ContractError::StaleData {
                node_id: record.node_id().to_string(),
                age_secs: age.num_seconds(),
                max_age_secs: self.max_age.num_seconds(),
            });
        }
        Ok(())
    }
}

fn group<'a>(payload: &'a Value, name: &str) -> Result<&'a Value, ContractError> {
    match payload.get(name) {
        Some(v) if v.is_object() => Ok(v),
        other => Err(ContractError::violation(name, other, "required object")),
    }
}

fn leaf<'a>(group: &'a Value, path: &str) -> Result<&'a Value, ContractError> {
    let name = leaf_name(path);
    group
        .get(name)
        .filter(|v| !v.is_null())
        .ok_or_else(|| ContractError::violation(path, group.get(name), "required field"))
}

fn text(group: &Value, path: &str) -> Result<String, ContractError> {
    let v = leaf(group, path)?;
    match v.as_str() {
        Some(s) if !s.trim().is_empty() => Ok(s.to_string()),
        Some(_) => Err(ContractError::violation(path, Some(v), "must not be empty")),
        None => Err(ContractError::violation(path, Some(v), "must be a string")),
    }
}

fn timestamp(group: &Value, path: &str) -> Result<DateTime<Utc>, ContractError> {
    let v = leaf(group, path)?;
    let raw = v
        .as_str()
        .ok_or_else(|| ContractError::violation(path, Some(v), "must be an RFC 3339 string"))?;
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|_| ContractError::violation(path, Some(v), "must be an RFC 3339 timestamp with offset"))
}

fn number(group: &Value, path: &str) -> Result<f64, ContractError> {
    let v = leaf(group, path)?;
    match v.as_f64() {
        Some(n) if n.is_finite() => Ok(n),
        _ => Err(ContractError::violation(path, Some(v), "must be a number")),
    }
}

fn fraction(group: &Value, path: &str) -> Result<f64, ContractError> {
    let n = number(group, path)?;
    if !(0.0..=1.0).contains(&n) {
        return Err(ContractError::violation(path, group.get(leaf_name(path)), "must be within [0, 1]"));
    }
    Ok(n)
}

fn non_negative(group: &Value, path: &str) -> Result<f64, ContractError> {
    let n = number(group, path)?;
    if n < 0.0 {
        return Err(ContractError::violation(path, group.get(leaf_name(path)), "must be >= 0"));
    }
    Ok(n)
}

fn counter(group: &Value, path: &str) -> Result<u64, ContractError> {
    let v = leaf(group, path)?;
    // Counters land in BIGINT columns.
    if let Some(n) = v.as_u64() {
        if i64::try_from(n).is_ok() {
            return Ok(n);
        }
        return Err(ContractError::violation(path, Some(v), "must fit a signed 64-bit integer"));
    }
    let reason = match v.as_i64() {
        Some(_) => "must be >= 0",
        None if v.is_number() => "must be an integer",
        None => "must be a non-negative integer",
    };
    Err(ContractError::violation(path, Some(v), reason))
}

fn leaf_name(path: &str) -> &str {
    path.rsplit('.').next().unwrap_or(path)
}
