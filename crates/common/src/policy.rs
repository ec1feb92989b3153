use serde::{Deserialize, Serialize};
use std::fmt;

use crate::risk::{RiskCandidate, RiskScore};

const PAGE_THRESHOLD: u8 = 80;
const DATABASE_PAGE_THRESHOLD: u8 = 50;
const LOG_THRESHOLD: u8 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Ignore,
    SlackLog,
    PagerdutyTrigger,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ignore => "IGNORE",
            Self::SlackLog => "SLACK_LOG",
            Self::PagerdutyTrigger => "PAGERDUTY_TRIGGER",
        }
    }

    pub fn is_actionable(self) -> bool {
        self != Self::Ignore
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a risk score and host role to an alerting action.
///
/// Rules are checked in order and the first match wins:
///
/// | score        | database | action              |
/// |--------------|----------|---------------------|
/// | > 80         | any      | `PAGERDUTY_TRIGGER` |
/// | > 50         | yes      | `PAGERDUTY_TRIGGER` |
/// | > 20         | any      | `SLACK_LOG`         |
/// | otherwise    | any      | `IGNORE`            |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PolicyEngine;

impl PolicyEngine {
    pub const fn new() -> Self {
        Self
    }

    pub fn evaluate(&self, score: RiskScore, is_database: bool) -> Action {
        let score = score.value();
        if score > PAGE_THRESHOLD {
            Action::PagerdutyTrigger
        } else if score > DATABASE_PAGE_THRESHOLD && is_database {
            Action::PagerdutyTrigger
        } else if score > LOG_THRESHOLD {
            Action::SlackLog
        } else {
            Action::Ignore
        }
    }

    pub fn decide(&self, candidate: &RiskCandidate) -> Action {
        self.evaluate(candidate.score, candidate.is_database)
    }
}
