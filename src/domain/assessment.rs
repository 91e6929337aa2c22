//! Risk assessment result types.
//!
//! Represents the output of one classifier invocation: a binary risk
//! label plus the probability the model assigned to that label.

use serde::{Deserialize, Serialize};

/// Binary risk classification for heart disease.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLabel {
    /// Low risk of heart disease (class 0)
    Low,
    /// High risk of heart disease (class 1)
    High,
}

impl RiskLabel {
    /// Map a classifier output code to a label. Any nonzero code is
    /// treated as the positive class.
    #[must_use]
    pub fn from_code(code: u8) -> Self {
        if code == 0 {
            Self::Low
        } else {
            Self::High
        }
    }

    /// The integer class code the classifier was trained with.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Low => 0,
            Self::High => 1,
        }
    }

    /// Get a human-readable description.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Low => "Low risk - No significant indicators",
            Self::High => "High risk - Immediate consultation advised",
        }
    }
}

impl std::fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

/// Result of one inference call.
///
/// `confidence` is the probability the model assigned to its own
/// predicted class; for a Low prediction it is P(class=0), not the
/// maximum over both classes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Predicted risk label
    pub label: RiskLabel,

    /// Probability of the predicted class (0.0 to 1.0)
    pub confidence: f64,
}

impl RiskAssessment {
    /// Create a new assessment.
    #[must_use]
    pub fn new(label: RiskLabel, confidence: f64) -> Self {
        Self { label, confidence }
    }

    /// Verdict banner shown to the operator.
    #[must_use]
    pub fn verdict(&self) -> &'static str {
        match self.label {
            RiskLabel::Low => "✅ Low Risk of Heart Disease",
            RiskLabel::High => "❌ High Risk of Heart Disease",
        }
    }

    /// Confidence as a percentage string rounded to 2 decimal places.
    #[must_use]
    pub fn confidence_percent(&self) -> String {
        format!("{:.2}%", self.confidence * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_codes() {
        assert_eq!(RiskLabel::from_code(0), RiskLabel::Low);
        assert_eq!(RiskLabel::from_code(1), RiskLabel::High);
        assert_eq!(RiskLabel::Low.code(), 0);
        assert_eq!(RiskLabel::High.code(), 1);
    }

    #[test]
    fn test_verdict_messages() {
        let high = RiskAssessment::new(RiskLabel::High, 0.97);
        assert_eq!(high.verdict(), "❌ High Risk of Heart Disease");

        let low = RiskAssessment::new(RiskLabel::Low, 0.85);
        assert_eq!(low.verdict(), "✅ Low Risk of Heart Disease");
    }

    #[test]
    fn test_confidence_percent_formatting() {
        let assessment = RiskAssessment::new(RiskLabel::High, 0.974215);
        assert_eq!(assessment.confidence_percent(), "97.42%");

        let exact = RiskAssessment::new(RiskLabel::Low, 0.5);
        assert_eq!(exact.confidence_percent(), "50.00%");
    }
}
