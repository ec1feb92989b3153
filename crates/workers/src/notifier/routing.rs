use async_trait::async_trait;
use std::sync::Arc;

use pcopp_common::alert::AlertEvent;
use pcopp_common::policy::Action;

use super::log::LogSink;
use super::sink::{AlertSink, NotifyError};

/// Sends each event to the channel its action names, falling back to the log
/// when that channel is not configured.
pub struct RoutingSink {
    slack: Option<Arc<dyn AlertSink>>,
    pagerduty: Option<Arc<dyn AlertSink>>,
    fallback: Arc<dyn AlertSink>,
}

impl Default for RoutingSink {
    fn default() -> Self {
        Self {
            slack: None,
            pagerduty: None,
            fallback: Arc::new(LogSink),
        }
    }
}

impl RoutingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slack(mut self, sink: Arc<dyn AlertSink>) -> Self {
        self.slack = Some(sink);
        self
    }

    pub fn with_pagerduty(mut self, sink: Arc<dyn AlertSink>) -> Self {
        self.pagerduty = Some(sink);
        self
    }

    pub fn with_fallback(mut self, sink: Arc<dyn AlertSink>) -> Self {
        self.fallback = sink;
        self
    }

    fn route(&self, action: Action) -> &Arc<dyn AlertSink> {
        let chosen = match action {
            Action::PagerdutyTrigger => self.pagerduty.as_ref(),
            Action::SlackLog => self.slack.as_ref(),
            Action::Ignore => None,
        };
        chosen.unwrap_or(&self.fallback)
    }
}

#[async_trait]
impl AlertSink for RoutingSink {
    fn name(&self) -> &str {
        "routing"
    }

    async fn deliver(&self, event: &AlertEvent) -> Result<(), NotifyError> {
        let sink = self.route(event.action);
        tracing::debug!(sink = sink.name(), dedup_key = %event.dedup_key, "routing alert");
        sink.deliver(event).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcopp_common::risk::{RiskCandidate, RiskCategory, RiskScore};
    use std::sync::Mutex;

    struct Recording {
        name: &'static str,
        seen: Mutex<Vec<String>>,
    }

    impl Recording {
        fn new(name: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl AlertSink for Recording {
        fn name(&self) -> &str {
            self.name
        }

        async fn deliver(&self, event: &AlertEvent) -> Result<(), NotifyError> {
            self.seen.lock().unwrap().push(event.node_id.clone());
            Ok(())
        }
    }

    fn event(node: &str, action: Action) -> AlertEvent {
        let candidate = RiskCandidate {
            node_id: node.into(),
            category: RiskCategory::MemoryFrag,
            score: RiskScore::new(90).unwrap(),
            is_database: false,
            detail: None,
        };
        AlertEvent::new(candidate, action, "2026-03-01T10:00:00Z".parse().unwrap())
    }

    #[tokio::test]
    async fn routes_by_action() {
        let slack = Recording::new("slack");
        let pd = Recording::new("pagerduty");
        let fallback = Recording::new("fallback");
        let sink = RoutingSink::new()
            .with_slack(slack.clone())
            .with_pagerduty(pd.clone())
            .with_fallback(fallback.clone());

        sink.deliver(&event("a", Action::SlackLog)).await.unwrap();
        sink.deliver(&event("b", Action::PagerdutyTrigger)).await.unwrap();

        assert_eq!(*slack.seen.lock().unwrap(), vec!["a"]);
        assert_eq!(*pd.seen.lock().unwrap(), vec!["b"]);
        assert!(fallback.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unconfigured_channel_falls_back() {
        let fallback = Recording::new("fallback");
        let sink = RoutingSink::new().with_fallback(fallback.clone());

        sink.deliver(&event("c", Action::PagerdutyTrigger)).await.unwrap();
        assert_eq!(*fallback.seen.lock().unwrap(), vec!["c"]);
    }
}
