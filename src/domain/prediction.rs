//! Prediction and advice payloads returned by the server.

use serde::{Deserialize, Serialize};

use super::RiskLevel;

/// Precautions block (`precautions.title`, `precautions.precautions`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Precautions {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub precautions: Vec<String>,
}

/// Diet plan block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DietPlan {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub foods_to_eat: Vec<String>,
    #[serde(default)]
    pub foods_to_avoid: Vec<String>,
}

/// Response of `POST /api/predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    #[serde(default)]
    pub diagnosis: String,

    /// Risk of heart disease, 0-100
    pub risk_percentage: f64,

    #[serde(default)]
    pub message: String,

    #[serde(default)]
    pub precautions: Precautions,

    #[serde(default)]
    pub diet_plan: DietPlan,

    /// Server timestamp (ISO-8601 or SQLite format)
    #[serde(default)]
    pub timestamp: String,
}

impl PredictionResult {
    /// Client-side risk classification of this result.
    #[must_use]
    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_percentage(self.risk_percentage)
    }
}

/// Response of `GET /api/get-content`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdviceContent {
    #[serde(default)]
    pub precautions: Precautions,
    #[serde(default)]
    pub diet_plan: DietPlan,
}

impl From<&PredictionResult> for AdviceContent {
    fn from(result: &PredictionResult) -> Self {
        Self {
            precautions: result.precautions.clone(),
            diet_plan: result.diet_plan.clone(),
        }
    }
}

/// Format a server timestamp in local time, falling back to the raw text.
///
/// Accepts RFC 3339 (`2026-01-05T10:30:00Z`), naive ISO (`2026-01-05T10:30:00.123`,
/// already local wall-clock time) and SQLite `CURRENT_TIMESTAMP`
/// (`2026-01-05 10:30:00`, UTC).
#[must_use]
pub fn format_timestamp(raw: &str) -> String {
    use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

    const LOCAL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.with_timezone(&Local).format(LOCAL_FORMAT).to_string();
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        // Nonexistent local times (DST gap) keep their wall-clock reading.
        return match Local.from_local_datetime(&naive).earliest() {
            Some(local) => local.format(LOCAL_FORMAT).to_string(),
            None => naive.format(LOCAL_FORMAT).to_string(),
        };
    }

    for pattern in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, pattern) {
            return Utc
                .from_utc_datetime(&naive)
                .with_timezone(&Local)
                .format(LOCAL_FORMAT)
                .to_string();
        }
    }

    raw.to_string()
}
