use serde::{Deserialize, Serialize};
use std::fmt;

pub const MAX_RISK_SCORE: u8 = 100;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RiskError {
    #[error("risk score {0} outside 0..=100")]
    ScoreOutOfRange(i64),
}

/// Integer risk score, always within `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct RiskScore(u8);

impl RiskScore {
    pub fn new(value: i64) -> Result<Self, RiskError> {
        match u8::try_from(value) {
            Ok(v) if v <= MAX_RISK_SCORE => Ok(Self(v)),
            _ => Err(RiskError::ScoreOutOfRange(value)),
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for RiskScore {
    type Error = RiskError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RiskScore> for u8 {
    fn from(s: RiskScore) -> Self {
        s.0
    }
}

impl fmt::Display for RiskScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RiskCategory {
    MemoryFrag,
    IoDeathSpiral,
    Other(String),
}

impl RiskCategory {
    pub fn as_str(&self) -> &str {
        match self {
            Self::MemoryFrag => "MEMORY_FRAG",
            Self::IoDeathSpiral => "IO_DEATH_SPIRAL",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for RiskCategory {
    fn from(s: String) -> Self {
        match s.as_str() {
            "MEMORY_FRAG" => Self::MemoryFrag,
            "IO_DEATH_SPIRAL" => Self::IoDeathSpiral,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for RiskCategory {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<RiskCategory> for String {
    fn from(c: RiskCategory) -> Self {
        match c {
            RiskCategory::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The precomputed risk views the scanner and the on-demand query read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RiskView {
    Fragmentation,
    StalledIo,
}

impl RiskView {
    pub const ALL: [RiskView; 2] = [RiskView::Fragmentation, RiskView::StalledIo];

    pub fn relation(self) -> &'static str {
        match self {
            Self::Fragmentation => "view_risk_fragmentation",
            Self::StalledIo => "view_risk_stalled_io",
        }
    }

    pub fn default_category(self) -> RiskCategory {
        match self {
            Self::Fragmentation => RiskCategory::MemoryFrag,
            Self::StalledIo => RiskCategory::IoDeathSpiral,
        }
    }
}

/// A row as the view layer returns it, before range checks.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct RiskRow {
    pub node_id: String,
    pub risk_type: Option<String>,
    pub score: i64,
    pub is_database: bool,
    pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskCandidate {
    pub node_id: String,
    pub category: RiskCategory,
    pub score: RiskScore,
    pub is_database: bool,
    pub detail: Option<String>,
}

impl RiskCandidate {
    pub fn from_row(view: RiskView, row: RiskRow) -> Result<Self, RiskError> {
        let score = RiskScore::new(row.score)?;
        let category = row
            .risk_type
            .filter(|t| !t.is_empty())
            .map(RiskCategory::from)
            .unwrap_or_else(|| view.default_category());
        Ok(Self {
            node_id: row.node_id,
            category,
            score,
            is_database: row.is_database,
            detail: row.detail,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(score: i64, risk_type: Option<&str>) -> RiskRow {
        RiskRow {
            node_id: "node-1".into(),
            risk_type: risk_type.map(String::from),
            score,
            is_database: true,
            detail: Some("Frag Index: 0.91 (Rising)".into()),
        }
    }

    #[test]
    fn score_bounds() {
        assert_eq!(RiskScore::new(0).unwrap().value(), 0);
        assert_eq!(RiskScore::new(100).unwrap().value(), 100);
        assert_eq!(RiskScore::new(101), Err(RiskError::ScoreOutOfRange(101)));
        assert_eq!(RiskScore::new(-1), Err(RiskError::ScoreOutOfRange(-1)));
    }

    #[test]
    fn score_deserialize_rejects_out_of_range() {
        assert!(serde_json::from_str::<RiskScore>("150").is_err());
        assert_eq!(serde_json::from_str::<RiskScore>("42").unwrap().value(), 42);
        assert_eq!(serde_json::to_string(&RiskScore::new(7).unwrap()).unwrap(), "7");
    }

    #[test]
    fn category_wire_names() {
        assert_eq!(RiskCategory::from("MEMORY_FRAG"), RiskCategory::MemoryFrag);
        assert_eq!(RiskCategory::from("IO_DEATH_SPIRAL"), RiskCategory::IoDeathSpiral);
        assert_eq!(
            RiskCategory::from("THERMAL"),
            RiskCategory::Other("THERMAL".into())
        );
        let json = serde_json::to_string(&RiskCategory::IoDeathSpiral).unwrap();
        assert_eq!(json, "\"IO_DEATH_SPIRAL\"");
        assert_eq!(String::from(RiskCategory::Other("X".into())), "X");
    }

    #[test]
    fn candidate_from_row_uses_row_category() {
        let c = RiskCandidate::from_row(RiskView::StalledIo, row(85, Some("MEMORY_FRAG"))).unwrap();
        assert_eq!(c.category, RiskCategory::MemoryFrag);
        assert_eq!(c.score.value(), 85);
        assert!(c.is_database);
    }

    #[test]
    fn candidate_from_row_falls_back_to_view_category() {
        let c = RiskCandidate::from_row(RiskView::StalledIo, row(40, None)).unwrap();
        assert_eq!(c.category, RiskCategory::IoDeathSpiral);
        let c = RiskCandidate::from_row(RiskView::Fragmentation, row(40, Some(""))).unwrap();
        assert_eq!(c.category, RiskCategory::MemoryFrag);
    }

    #[test]
    fn candidate_from_row_rejects_bad_score() {
        let err = RiskCandidate::from_row(RiskView::Fragmentation, row(250, None)).unwrap_err();
        assert_eq!(err, RiskError::ScoreOutOfRange(250));
    }

    #[test]
    fn view_relations() {
        assert_eq!(RiskView::Fragmentation.relation(), "view_risk_fragmentation");
        assert_eq!(RiskView::StalledIo.relation(), "view_risk_stalled_io");
    }
}
