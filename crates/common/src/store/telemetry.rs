use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use sqlx::PgPool;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::error::StorageError;
use crate::telemetry::TelemetryRecord;

/// Persists validated telemetry, one row per record.
#[async_trait]
pub trait TelemetryStore: Send + Sync {
    async fn write(&self, record: &TelemetryRecord) -> Result<(), StorageError>;

    /// Keeps a stale record out of the tables the risk views read.
    async fn archive(&self, record: &TelemetryRecord) -> Result<(), StorageError>;
}

pub struct PgTelemetryStore {
    pool: PgPool,
}

impl PgTelemetryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert(&self, table: Table, record: &TelemetryRecord) -> Result<(), StorageError> {
        let payload = record.to_json()?;
        sqlx::query(table.insert_sql())
            .bind(record.timestamp())
            .bind(record.node_id())
            .bind(&payload)
            .bind(record.memory.mem_frag_index)
            .bind(to_i64(record.scheduler.procs_blocked))
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[derive(Clone, Copy)]
enum Table {
    Raw,
    Stale,
}

impl Table {
    fn insert_sql(self) -> &'static str {
        match self {
            Self::Raw => {
                "INSERT INTO telemetry_raw (timestamp_utc, node_id, payload, frag_index, d_state_count) \
                 VALUES ($1, $2, $3, $4, $5)"
            }
            Self::Stale => {
                "INSERT INTO telemetry_stale (timestamp_utc, node_id, payload, frag_index, d_state_count) \
                 VALUES ($1, $2, $3, $4, $5)"
            }
        }
    }
}

#[async_trait]
impl TelemetryStore for PgTelemetryStore {
    async fn write(&self, record: &TelemetryRecord) -> Result<(), StorageError> {
        self.insert(Table::Raw, record).await
    }

    async fn archive(&self, record: &TelemetryRecord) -> Result<(), StorageError> {
        self.insert(Table::Stale, record).await
    }
}

fn to_i64(v: u64) -> i64 {
    i64::try_from(v).unwrap_or(i64::MAX)
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredRow {
    pub id: u64,
    pub timestamp_utc: DateTime<Utc>,
    pub node_id: String,
    pub payload: serde_json::Value,
    pub frag_index: f64,
    pub d_state_count: i64,
    pub archived: bool,
}

/// Process-local store with the same row shape as the Postgres tables.
#[derive(Clone, Default)]
pub struct MemoryTelemetryStore {
    rows: Arc<DashMap<u64, StoredRow>>,
    next_id: Arc<AtomicU64>,
}

impl MemoryTelemetryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&self, record: &TelemetryRecord, archived: bool) -> Result<(), StorageError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.rows.insert(
            id,
            StoredRow {
                id,
                timestamp_utc: record.timestamp(),
                node_id: record.node_id().to_string(),
                payload: record.to_json()?,
                frag_index: record.memory.mem_frag_index,
                d_state_count: to_i64(record.scheduler.procs_blocked),
                archived,
            },
        );
        Ok(())
    }

    pub fn raw_rows(&self) -> Vec<StoredRow> {
        self.sorted(|r| !r.archived)
    }

    pub fn archived_rows(&self) -> Vec<StoredRow> {
        self.sorted(|r| r.archived)
    }

    pub fn count(&self) -> usize {
        self.rows.len()
    }

    fn sorted(&self, keep: impl Fn(&StoredRow) -> bool) -> Vec<StoredRow> {
        let mut rows: Vec<StoredRow> = self
            .rows
            .iter()
            .filter(|r| keep(r.value()))
            .map(|r| r.value().clone())
            .collect();
        rows.sort_by_key(|r| r.id);
        rows
    }
}

#[async_trait]
impl TelemetryStore for MemoryTelemetryStore {
    async fn write(&self, record: &TelemetryRecord) -> Result<(), StorageError> {
        self.insert(record, false)
    }

    async fn archive(&self, record: &TelemetryRecord) -> Result<(), StorageError> {
        self.insert(record, true)
    }
}
