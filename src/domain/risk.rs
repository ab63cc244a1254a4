//! Risk level classification.
//!
//! The server returns a raw percentage; every view classifies it through
//! [`RiskLevel::from_percentage`] so thresholds stay identical across the UI.

use serde::{Deserialize, Serialize};

/// Lower bound (inclusive) of the moderate band, in percent.
pub const MODERATE_THRESHOLD: f64 = 34.0;

/// Lower bound (inclusive) of the high band, in percent.
pub const HIGH_THRESHOLD: f64 = 67.0;

/// Risk level classification for heart disease.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    /// Low risk of heart disease
    Low,
    /// Moderate risk, monitoring recommended
    Moderate,
    /// High risk, consultation recommended
    High,
}

impl RiskLevel {
    /// Classify a risk percentage (0-100).
    #[must_use]
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= HIGH_THRESHOLD {
            Self::High
        } else if percentage >= MODERATE_THRESHOLD {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    /// Parse a server label such as `HIGH_RISK` (suffix and case optional).
    #[must_use]
    pub fn from_wire_label(label: &str) -> Option<Self> {
        let upper = label.trim().to_ascii_uppercase().replace(' ', "_");
        let base = upper.strip_suffix("_RISK").unwrap_or(&upper);
        match base {
            "LOW" => Some(Self::Low),
            "MODERATE" => Some(Self::Moderate),
            "HIGH" => Some(Self::High),
            _ => None,
        }
    }

    /// Label used by the server's `risk_level` column and query parameter.
    #[must_use]
    pub fn wire_label(&self) -> &'static str {
        match self {
            Self::Low => "LOW_RISK",
            Self::Moderate => "MODERATE_RISK",
            Self::High => "HIGH_RISK",
        }
    }

    /// Styling class name (`low`, `moderate`, `high`).
    #[must_use]
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
        }
    }

    /// Get a human-readable description.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Low => "Low risk - keep up your healthy habits",
            Self::Moderate => "Moderate risk - follow-up recommended",
            Self::High => "High risk - consult a cardiologist soon",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Moderate => write!(f, "MODERATE"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

/// Render a server label for display (`HIGH_RISK` -> `HIGH RISK`).
#[must_use]
pub fn display_label(label: &str) -> String {
    label.replace('_', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_boundaries() {
        assert_eq!(RiskLevel::from_percentage(0.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_percentage(33.9), RiskLevel::Low);
        assert_eq!(RiskLevel::from_percentage(34.0), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_percentage(66.99), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_percentage(67.0), RiskLevel::High);
        assert_eq!(RiskLevel::from_percentage(100.0), RiskLevel::High);
    }

    #[test]
    fn test_sixty_seven_is_high_class() {
        assert_eq!(RiskLevel::from_percentage(67.0).css_class(), "high");
    }

    #[test]
    fn test_wire_labels() {
        assert_eq!(RiskLevel::from_wire_label("HIGH_RISK"), Some(RiskLevel::High));
        assert_eq!(RiskLevel::from_wire_label("moderate"), Some(RiskLevel::Moderate));
        assert_eq!(RiskLevel::from_wire_label("Low Risk"), Some(RiskLevel::Low));
        assert_eq!(RiskLevel::from_wire_label("UNKNOWN"), None);
        assert_eq!(
            RiskLevel::from_wire_label(RiskLevel::Moderate.wire_label()),
            Some(RiskLevel::Moderate)
        );
    }

    #[test]
    fn test_display_label() {
        assert_eq!(display_label("MODERATE_RISK"), "MODERATE RISK");
    }
}
