//! Confidence level module

use serde::{Deserialize, Serialize};

/// Qualitative band for an aggregate confidence score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    /// >= 0.85
    High,
    /// 0.60 - 0.85
    Medium,
    /// 0.40 - 0.60
    Low,
    /// < 0.40
    Critical,
}

impl ConfidenceLevel {
    /// Classify a confidence score
    ///
    /// # Examples
    ///
    /// ```
    /// use ternary_domain::ConfidenceLevel;
    ///
    /// assert_eq!(ConfidenceLevel::classify(0.9), ConfidenceLevel::High);
    /// assert_eq!(ConfidenceLevel::classify(0.45), ConfidenceLevel::Low);
    /// ```
    pub fn classify(confidence: f64) -> Self {
        if confidence >= 0.85 {
            ConfidenceLevel::High
        } else if confidence >= 0.60 {
            ConfidenceLevel::Medium
        } else if confidence >= 0.40 {
            ConfidenceLevel::Low
        } else {
            ConfidenceLevel::Critical
        }
    }

    /// Level name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLevel::High => "high",
            ConfidenceLevel::Medium => "medium",
            ConfidenceLevel::Low => "low",
            ConfidenceLevel::Critical => "critical",
        }
    }
}
