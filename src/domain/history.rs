//! Assessment history rows and the risk filter applied to them.

use serde::{Deserialize, Serialize};

use super::risk::display_label;
use super::RiskLevel;

/// One row of `GET /api/history`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    #[serde(default)]
    pub created_at: String,
    pub age: i64,
    pub resting_blood_pressure: i64,
    pub cholesterol: i64,
    pub risk_percentage: f64,
    #[serde(default)]
    pub risk_level: String,
}

impl HistoryRecord {
    /// Client-side classification, used for styling and filtering.
    #[must_use]
    pub fn classified_level(&self) -> RiskLevel {
        RiskLevel::from_percentage(self.risk_percentage)
    }

    /// Risk label as shown in the table (`HIGH RISK`).
    #[must_use]
    pub fn level_label(&self) -> String {
        if self.risk_level.trim().is_empty() {
            return display_label(self.classified_level().wire_label());
        }
        match RiskLevel::from_wire_label(&self.risk_level) {
            Some(level) => display_label(level.wire_label()),
            None => display_label(&self.risk_level),
        }
    }

    /// Risk percentage with one decimal place.
    #[must_use]
    pub fn percentage_label(&self) -> String {
        format!("{:.1}%", self.risk_percentage)
    }
}

/// Envelope of `GET /api/history`; a missing list means no history.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub history: Option<Vec<HistoryRecord>>,
}

impl HistoryResponse {
    #[must_use]
    pub fn into_records(self) -> Vec<HistoryRecord> {
        self.history.unwrap_or_default()
    }
}

/// Risk filter for the history view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HistoryFilter {
    #[default]
    All,
    Only(RiskLevel),
}

impl HistoryFilter {
    /// Next filter in the cycle All -> Low -> Moderate -> High -> All.
    #[must_use]
    pub fn cycle(self) -> Self {
        match self {
            Self::All => Self::Only(RiskLevel::Low),
            Self::Only(RiskLevel::Low) => Self::Only(RiskLevel::Moderate),
            Self::Only(RiskLevel::Moderate) => Self::Only(RiskLevel::High),
            Self::Only(RiskLevel::High) => Self::All,
        }
    }

    #[must_use]
    pub fn matches(&self, record: &HistoryRecord) -> bool {
        match self {
            Self::All => true,
            Self::Only(level) => record.classified_level() == *level,
        }
    }

    /// Records passing the filter, in server order.
    #[must_use]
    pub fn apply<'a>(&self, records: &'a [HistoryRecord]) -> Vec<&'a HistoryRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Only(RiskLevel::Low) => "Low",
            Self::Only(RiskLevel::Moderate) => "Moderate",
            Self::Only(RiskLevel::High) => "High",
        }
    }
}
