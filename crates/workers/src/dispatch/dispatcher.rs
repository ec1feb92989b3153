use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;

use pcopp_common::alert::AlertEvent;
use pcopp_common::policy::Action;
use pcopp_common::risk::RiskCandidate;

use crate::notifier::AlertSink;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub delivered: usize,
    pub failed: usize,
    /// Pairs that produced no event: `IGNORE` decisions and duplicate keys.
    pub suppressed: usize,
}

pub struct AlertDispatcher {
    sink: Arc<dyn AlertSink>,
}

impl AlertDispatcher {
    pub fn new(sink: Arc<dyn AlertSink>) -> Self {
        Self { sink }
    }

    /// Turns decisions into events. Holds no state between calls.
    ///
    /// Events keep the order in which their key first appeared. For a repeated
    /// key the higher score replaces the earlier event; on a tie the first
    /// one stays.
    pub fn plan<I>(pairs: I, now: DateTime<Utc>) -> Vec<AlertEvent>
    where
        I: IntoIterator<Item = (RiskCandidate, Action)>,
    {
        let mut events: Vec<AlertEvent> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for (candidate, action) in pairs {
            if !action.is_actionable() {
                continue;
            }
            let event = AlertEvent::new(candidate, action, now);
            match index.get(&event.dedup_key) {
                Some(&i) => {
                    if event.score > events[i].score {
                        events[i] = event;
                    }
                }
                None => {
                    index.insert(event.dedup_key.clone(), events.len());
                    events.push(event);
                }
            }
        }

        events
    }

    /// One delivery attempt per planned event. A failed delivery is logged and
    /// the remaining events are still sent.
    pub async fn dispatch(&self, pairs: Vec<(RiskCandidate, Action)>, now: DateTime<Utc>) -> DispatchReport {
        let total = pairs.len();
        let events = Self::plan(pairs, now);
        let mut report = DispatchReport {
            suppressed: total - events.len(),
            ..Default::default()
        };

        for event in &events {
            match self.sink.deliver(event).await {
                Ok(()) => {
                    tracing::info!(
                        sink = self.sink.name(),
                        node_id = %event.node_id,
                        category = %event.category,
                        action = %event.action,
                        "alert delivered"
                    );
                    report.delivered += 1;
                }
                Err(e) => {
                    tracing::error!(
                        sink = self.sink.name(),
                        node_id = %event.node_id,
                        dedup_key = %event.dedup_key,
                        error = %e,
                        "alert delivery failed"
                    );
                    report.failed += 1;
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifier::NotifyError;
    use async_trait::async_trait;
    use pcopp_common::risk::{RiskCategory, RiskScore};
    use std::collections::HashSet;
    use std::sync::Mutex;

    fn now() -> DateTime<Utc> {
        "2026-03-01T10:00:00Z".parse().unwrap()
    }

    fn pair(node: &str, category: RiskCategory, score: i64, action: Action) -> (RiskCandidate, Action) {
        (
            RiskCandidate {
                node_id: node.into(),
                category,
                score: RiskScore::new(score).unwrap(),
                is_database: false,
                detail: Some(format!("score {score}")),
            },
            action,
        )
    }

    #[derive(Default)]
    struct FlakySink {
        fail_nodes: Vec<&'static str>,
        delivered: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl AlertSink for FlakySink {
        fn name(&self) -> &str {
            "flaky"
        }

        async fn deliver(&self, event: &AlertEvent) -> Result<(), NotifyError> {
            if self.fail_nodes.contains(&event.node_id.as_str()) {
                return Err(NotifyError::Rejected {
                    channel: "flaky",
                    status: 500,
                });
            }
            self.delivered.lock().unwrap().push(event.node_id.clone());
            Ok(())
        }
    }

    #[test]
    fn planning_is_repeatable() {
        let input = vec![
            pair("a", RiskCategory::MemoryFrag, 85, Action::PagerdutyTrigger),
            pair("b", RiskCategory::IoDeathSpiral, 30, Action::SlackLog),
            pair("c", RiskCategory::MemoryFrag, 5, Action::Ignore),
        ];
        let first = AlertDispatcher::plan(input.clone(), now());
        let second = AlertDispatcher::plan(input, now());
        assert_eq!(first, second);

        let keys: HashSet<_> = first.iter().map(|e| e.dedup_key.clone()).collect();
        assert_eq!(keys.len(), 2);
    }

    #[test]
    fn ignore_produces_no_event() {
        let events = AlertDispatcher::plan(
            vec![pair("quiet", RiskCategory::MemoryFrag, 10, Action::Ignore)],
            now(),
        );
        assert!(events.is_empty());
    }

    #[test]
    fn duplicate_key_keeps_highest_score() {
        let events = AlertDispatcher::plan(
            vec![
                pair("a", RiskCategory::MemoryFrag, 40, Action::SlackLog),
                pair("b", RiskCategory::MemoryFrag, 30, Action::SlackLog),
                pair("a", RiskCategory::MemoryFrag, 90, Action::PagerdutyTrigger),
            ],
            now(),
        );
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].node_id, "a");
        assert_eq!(events[0].score.value(), 90);
        assert_eq!(events[0].action, Action::PagerdutyTrigger);
        assert_eq!(events[1].node_id, "b");
    }

    #[test]
    fn duplicate_tie_keeps_first() {
        let events = AlertDispatcher::plan(
            vec![
                pair("a", RiskCategory::MemoryFrag, 40, Action::SlackLog),
                pair("a", RiskCategory::MemoryFrag, 40, Action::PagerdutyTrigger),
            ],
            now(),
        );
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].action, Action::SlackLog);
    }

    #[test]
    fn same_node_different_category_both_kept() {
        let events = AlertDispatcher::plan(
            vec![
                pair("a", RiskCategory::MemoryFrag, 40, Action::SlackLog),
                pair("a", RiskCategory::IoDeathSpiral, 60, Action::SlackLog),
            ],
            now(),
        );
        assert_eq!(events.len(), 2);
    }

    #[tokio::test]
    async fn failed_delivery_does_not_stop_the_rest() {
        let sink = Arc::new(FlakySink {
            fail_nodes: vec!["b"],
            ..Default::default()
        });
        let dispatcher = AlertDispatcher::new(sink.clone());

        let report = dispatcher
            .dispatch(
                vec![
                    pair("a", RiskCategory::MemoryFrag, 30, Action::SlackLog),
                    pair("b", RiskCategory::MemoryFrag, 30, Action::SlackLog),
                    pair("c", RiskCategory::MemoryFrag, 30, Action::SlackLog),
                    pair("d", RiskCategory::MemoryFrag, 3, Action::Ignore),
                ],
                now(),
            )
            .await;

        assert_eq!(
            report,
            DispatchReport {
                delivered: 2,
                failed: 1,
                suppressed: 1,
            }
        );
        assert_eq!(*sink.delivered.lock().unwrap(), vec!["a", "c"]);
    }
}
