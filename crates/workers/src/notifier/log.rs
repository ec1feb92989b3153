use async_trait::async_trait;

use pcopp_common::alert::AlertEvent;

use super::sink::{AlertSink, NotifyError};

/// Writes alerts to the structured log. Used when no channel is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

#[async_trait]
impl AlertSink for LogSink {
    fn name(&self) -> &str {
        "log"
    }

    async fn deliver(&self, event: &AlertEvent) -> Result<(), NotifyError> {
        tracing::warn!(
            node_id = %event.node_id,
            category = %event.category,
            score = event.score.value(),
            action = %event.action,
            dedup_key = %event.dedup_key,
            detail = event.detail.as_deref().unwrap_or(""),
            "alert"
        );
        Ok(())
    }
}
