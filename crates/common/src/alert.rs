use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

use crate::policy::{Action, PolicyEngine};
use crate::risk::{RiskCandidate, RiskCategory, RiskScore};

pub fn fingerprint(node_id: &str, category: &RiskCategory) -> u64 {
    let mut hasher = std::hash::DefaultHasher::new();
    node_id.hash(&mut hasher);
    category.as_str().hash(&mut hasher);
    hasher.finish()
}

pub fn fingerprint_string(node_id: &str, category: &RiskCategory) -> String {
    format!("{:016x}", fingerprint(node_id, category))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    pub dedup_key: String,
    pub node_id: String,
    pub category: RiskCategory,
    pub score: RiskScore,
    pub action: Action,
    pub detail: Option<String>,
    pub emitted_at: DateTime<Utc>,
}

impl AlertEvent {
    pub fn new(candidate: RiskCandidate, action: Action, emitted_at: DateTime<Utc>) -> Self {
        Self {
            dedup_key: fingerprint_string(&candidate.node_id, &candidate.category),
            node_id: candidate.node_id,
            category: candidate.category,
            score: candidate.score,
            action,
            detail: candidate.detail,
            emitted_at,
        }
    }

    pub fn summary(&self) -> String {
        match &self.detail {
            Some(d) => format!("Node {} at risk: {} (score {}) - {}", self.node_id, self.category, self.score, d),
            None => format!("Node {} at risk: {} (score {})", self.node_id, self.category, self.score),
        }
    }
}

/// Response row of the on-demand alert query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveAlert {
    pub node_id: String,
    pub risk_type: RiskCategory,
    pub risk_score: RiskScore,
    pub recommended_action: Action,
}

/// Pairs every candidate with its action, dropping `IGNORE`.
pub fn actionable<I>(policy: &PolicyEngine, candidates: I) -> Vec<(RiskCandidate, Action)>
where
    I: IntoIterator<Item = RiskCandidate>,
{
    candidates
        .into_iter()
        .map(|c| {
            let action = policy.decide(&c);
            (c, action)
        })
        .filter(|(_, action)| action.is_actionable())
        .collect()
}

/// Highest score first, then node id, then category.
pub fn active_alerts<I>(policy: &PolicyEngine, candidates: I) -> Vec<ActiveAlert>
where
    I: IntoIterator<Item = RiskCandidate>,
{
    let mut alerts: Vec<ActiveAlert> = actionable(policy, candidates)
        .into_iter()
        .map(|(c, action)| ActiveAlert {
            node_id: c.node_id,
            risk_type: c.category,
            risk_score: c.score,
            recommended_action: action,
        })
        .collect();
    alerts.sort_by(|a, b| {
        b.risk_score
            .cmp(&a.risk_score)
            .then_with(|| a.node_id.cmp(&b.node_id))
            .then_with(|| a.risk_type.cmp(&b.risk_type))
    });
    alerts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(node: &str, score: i64, is_db: bool) -> RiskCandidate {
        RiskCandidate {
            node_id: node.into(),
            category: RiskCategory::MemoryFrag,
            score: RiskScore::new(score).unwrap(),
            is_database: is_db,
            detail: None,
        }
    }

    #[test]
    fn fingerprint_deterministic() {
        let a = fingerprint("n1", &RiskCategory::MemoryFrag);
        let b = fingerprint("n1", &RiskCategory::MemoryFrag);
        assert_eq!(a, b);
    }

    #[test]
    fn fingerprint_differs_by_category() {
        let a = fingerprint("n1", &RiskCategory::MemoryFrag);
        let b = fingerprint("n1", &RiskCategory::IoDeathSpiral);
        assert_ne!(a, b);
    }

    #[test]
    fn fingerprint_string_is_hex() {
        let s = fingerprint_string("n1", &RiskCategory::IoDeathSpiral);
        assert_eq!(s.len(), 16);
        assert!(s.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn only_paging_candidate_survives() {
        let policy = PolicyEngine::new();
        let alerts = active_alerts(&policy, vec![candidate("db-1", 85, true), candidate("web-1", 10, false)]);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].node_id, "db-1");
        assert_eq!(alerts[0].risk_score.value(), 85);
        assert_eq!(alerts[0].recommended_action, Action::PagerdutyTrigger);
    }

    #[test]
    fn active_alerts_sorted_by_score() {
        let policy = PolicyEngine::new();
        let alerts = active_alerts(
            &policy,
            vec![candidate("b", 30, false), candidate("a", 95, false), candidate("c", 30, false)],
        );
        let order: Vec<&str> = alerts.iter().map(|a| a.node_id.as_str()).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn active_alert_json_shape() {
        let policy = PolicyEngine::new();
        let alerts = active_alerts(&policy, vec![candidate("db-1", 60, true)]);
        let json = serde_json::to_value(&alerts[0]).unwrap();
        assert_eq!(json["node_id"], "db-1");
        assert_eq!(json["risk_type"], "MEMORY_FRAG");
        assert_eq!(json["risk_score"], 60);
        assert_eq!(json["recommended_action"], "PAGERDUTY_TRIGGER");
    }

    #[test]
    fn event_carries_candidate_fields() {
        let now: DateTime<Utc> = "2026-03-01T10:00:00Z".parse().unwrap();
        let mut c = candidate("n1", 70, false);
        c.detail = Some("Blocked Procs: 12 (Stuck > 30s)".into());
        let e = AlertEvent::new(c, Action::SlackLog, now);
        assert_eq!(e.dedup_key, fingerprint_string("n1", &RiskCategory::MemoryFrag));
        assert_eq!(e.emitted_at, now);
        assert!(e.summary().contains("Blocked Procs: 12"));
        assert!(e.summary().contains("score 70"));
    }
}
