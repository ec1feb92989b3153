use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use pcopp_common::alert::AlertEvent;
use pcopp_common::policy::Action;

use super::sink::{AlertSink, NotifyError};

pub struct SlackSink {
    webhook_url: String,
    client: Client,
}

impl SlackSink {
    pub fn new(webhook_url: String, timeout: Duration) -> Result<Self, NotifyError> {
        Ok(Self {
            webhook_url,
            client: NotifyError::client("slack", timeout)?,
        })
    }
}

pub(crate) fn payload(event: &AlertEvent) -> serde_json::Value {
    let color = match event.action {
        Action::PagerdutyTrigger => "#d32f2f",
        Action::SlackLog => "#f2c744",
        Action::Ignore => "#36a64f",
    };

    let mut fields = vec![
        serde_json::json!({ "title": "Node", "value": &event.node_id, "short": true }),
        serde_json::json!({ "title": "Risk", "value": event.category.as_str(), "short": true }),
        serde_json::json!({ "title": "Score", "value": event.score.value().to_string(), "short": true }),
        serde_json::json!({ "title": "Action", "value": event.action.as_str(), "short": true }),
    ];
    if let Some(detail) = &event.detail {
        fields.push(serde_json::json!({ "title": "Detail", "value": detail, "short": false }));
    }

    serde_json::json!({
        "attachments": [{
            "color": color,
            "title": format!(":warning: {} on {}", event.category, event.node_id),
            "fields": fields,
            "footer": event.dedup_key,
            "ts": event.emitted_at.timestamp(),
        }]
    })
}

#[async_trait]
impl AlertSink for SlackSink {
    fn name(&self) -> &str {
        "slack"
    }

    async fn deliver(&self, event: &AlertEvent) -> Result<(), NotifyError> {
        let result = self.client.post(&self.webhook_url).json(&payload(event)).send().await;
        NotifyError::from_response("slack", result)
    }
}
