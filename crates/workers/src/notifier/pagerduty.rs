use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use pcopp_common::alert::AlertEvent;

use super::sink::{AlertSink, NotifyError};

/// Events API v2 `trigger`. The alert's dedup key is passed through so
/// PagerDuty folds repeated triggers into one incident.
pub struct PagerDutySink {
    events_url: String,
    routing_key: String,
    client: Client,
}

impl PagerDutySink {
    pub fn new(events_url: String, routing_key: String, timeout: Duration) -> Result<Self, NotifyError> {
        Ok(Self {
            events_url,
            routing_key,
            client: NotifyError::client("pagerduty", timeout)?,
        })
    }
}

pub(crate) fn trigger_body(routing_key: &str, event: &AlertEvent) -> serde_json::Value {
    serde_json::json!({
        "routing_key": routing_key,
        "event_action": "trigger",
        "dedup_key": &event.dedup_key,
        "payload": {
            "summary": event.summary(),
            "source": &event.node_id,
            "severity": "critical",
            "component": event.category.as_str(),
            "timestamp": event.emitted_at.to_rfc3339(),
            "custom_details": {
                "risk_score": event.score.value(),
                "detail": &event.detail,
            },
        },
    })
}

#[async_trait]
impl AlertSink for PagerDutySink {
    fn name(&self) -> &str {
        "pagerduty"
    }

    async fn deliver(&self, event: &AlertEvent) -> Result<(), NotifyError> {
        let body = trigger_body(&self.routing_key, event);
        let result = self.client.post(&self.events_url).json(&body).send().await;
        NotifyError::from_response("pagerduty", result)
    }
}
