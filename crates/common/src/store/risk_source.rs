use async_trait::async_trait;
use dashmap::DashMap;
use sqlx::PgPool;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::error::StorageError;
use crate::risk::{RiskRow, RiskView};

#[async_trait]
pub trait RiskSource: Send + Sync {
    async fn fetch(&self, view: RiskView) -> Result<Vec<RiskRow>, StorageError>;

    /// Rows from every view, fragmentation first. Any view failing fails the
    /// whole fetch.
    async fn fetch_all(&self) -> Result<Vec<(RiskView, RiskRow)>, StorageError> {
        let mut out = Vec::new();
        for view in RiskView::ALL {
            let rows = self.fetch(view).await?;
            out.extend(rows.into_iter().map(|r| (view, r)));
        }
        Ok(out)
    }
}

pub struct PgRiskSource {
    pool: PgPool,
}

impl PgRiskSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn select_sql(view: RiskView) -> String {
    format!(
        "SELECT node_id::text AS node_id, risk_type::text AS risk_type, score::int8 AS score, \
         is_database, detail::text AS detail FROM {}",
        view.relation()
    )
}

#[async_trait]
impl RiskSource for PgRiskSource {
    async fn fetch(&self, view: RiskView) -> Result<Vec<RiskRow>, StorageError> {
        let rows = sqlx::query_as::<_, RiskRow>(&select_sql(view))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

/// Fixed rows per view, for tests.
#[derive(Clone, Default)]
pub struct StaticRiskSource {
    rows: Arc<DashMap<RiskView, Vec<RiskRow>>>,
    failing: Arc<AtomicBool>,
}

impl StaticRiskSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(self, view: RiskView, rows: Vec<RiskRow>) -> Self {
        self.set_rows(view, rows);
        self
    }

    pub fn set_rows(&self, view: RiskView, rows: Vec<RiskRow>) {
        self.rows.insert(view, rows);
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }
}

#[async_trait]
impl RiskSource for StaticRiskSource {
    async fn fetch(&self, view: RiskView) -> Result<Vec<RiskRow>, StorageError> {
        if self.failing.load(Ordering::Relaxed) {
            return Err(StorageError::Unavailable(format!("{} unreachable", view.relation())));
        }
        Ok(self.rows.get(&view).map(|r| r.clone()).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(node: &str, score: i64) -> RiskRow {
        RiskRow {
            node_id: node.into(),
            risk_type: None,
            score,
            is_database: false,
            detail: None,
        }
    }

    #[test]
    fn select_targets_view() {
        let sql = select_sql(RiskView::StalledIo);
        assert!(sql.ends_with("FROM view_risk_stalled_io"));
        assert!(sql.contains("is_database"));
    }

    #[tokio::test]
    async fn fetch_all_orders_fragmentation_first() {
        let source = StaticRiskSource::new()
            .with_rows(RiskView::StalledIo, vec![row("io-1", 90)])
            .with_rows(RiskView::Fragmentation, vec![row("frag-1", 40), row("frag-2", 50)]);

        let all = source.fetch_all().await.unwrap();
        let nodes: Vec<&str> = all.iter().map(|(_, r)| r.node_id.as_str()).collect();
        assert_eq!(nodes, vec!["frag-1", "frag-2", "io-1"]);
        assert_eq!(all[2].0, RiskView::StalledIo);
    }

    #[tokio::test]
    async fn empty_view_yields_no_rows() {
        let source = StaticRiskSource::new();
        assert!(source.fetch(RiskView::Fragmentation).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failing_source_errors() {
        let source = StaticRiskSource::new().with_rows(RiskView::Fragmentation, vec![row("n", 10)]);
        source.set_failing(true);
        let err = source.fetch_all().await.unwrap_err();
        assert!(err.to_string().contains("unreachable"));
    }
}
