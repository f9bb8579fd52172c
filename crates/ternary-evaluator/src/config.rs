//! Engine configuration
//!
//! Thresholds, domain tag and tuning knobs for the evaluator. Loadable from TOML:
//!
//! ```toml
//! proceed_threshold = 0.85
//! hold_threshold = 0.40
//! domain = "financial"
//! target_hold_rate = 0.20
//! conflict_threshold = 0.3
//! strict_weights = false
//!
//! [normalizer]
//! strong_magnitude = 0.5
//! strong_confidence = 1.0
//! weak_confidence = 0.6
//!
//! [domain_hints]
//! logistics = ["Check carrier capacity", "Confirm inventory levels"]
//! ```

use crate::EvaluatorError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ternary_domain::conflict::CONFLICT_THRESHOLD;
use ternary_domain::NormalizerConfig;

/// Configuration for the ternary evaluator
///
/// # Examples
///
/// ```
/// use ternary_evaluator::EngineConfig;
///
/// let config = EngineConfig::default();
/// assert_eq!(config.proceed_threshold, 0.85);
/// assert_eq!(config.hold_threshold, 0.40);
/// assert!(config.validate().is_ok());
///
/// let config = EngineConfig::conservative();
/// assert!(config.proceed_threshold > EngineConfig::default().proceed_threshold);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Minimum aggregate confidence for a forced PROCEED/HALT decision, in (0, 1]
    /// Default: 0.85
    #[serde(default = "default_proceed_threshold")]
    pub proceed_threshold: f64,

    /// Aggregate confidence below this is HALT (insufficient evidence),
    /// in [0, proceed_threshold)
    /// Default: 0.40
    #[serde(default = "default_hold_threshold")]
    pub hold_threshold: f64,

    /// Domain tag selecting extra next-step hints (e.g. "financial")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    /// Expected share of EPISTEMIC_HOLD outcomes, reported in statistics
    /// Default: 0.20
    #[serde(default = "default_target_hold_rate")]
    pub target_hold_rate: f64,

    /// Minimum distance between opposing readings to count as a conflict
    /// Default: 0.3
    #[serde(default = "default_conflict_threshold")]
    pub conflict_threshold: f64,

    /// Reject weights that name no signal in the evaluated set
    /// Default: false (open-world weighting)
    #[serde(default)]
    pub strict_weights: bool,

    /// Local-confidence rule for individual signals
    #[serde(default)]
    pub normalizer: NormalizerConfig,

    /// Extra next-step hints per domain; entries override the built-in table
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub domain_hints: BTreeMap<String, Vec<String>>,
}

fn default_proceed_threshold() -> f64 {
    0.85
}

fn default_hold_threshold() -> f64 {
    0.40
}

fn default_target_hold_rate() -> f64 {
    0.20
}

fn default_conflict_threshold() -> f64 {
    CONFLICT_THRESHOLD
}

impl Default for EngineConfig {
    /// Balanced thresholds: PROCEED at >= 0.85, HALT below 0.40
    fn default() -> Self {
        Self {
            proceed_threshold: default_proceed_threshold(),
            hold_threshold: default_hold_threshold(),
            domain: None,
            target_hold_rate: default_target_hold_rate(),
            conflict_threshold: default_conflict_threshold(),
            strict_weights: false,
            normalizer: NormalizerConfig::default(),
            domain_hints: BTreeMap::new(),
        }
    }
}

impl EngineConfig {
    /// Conservative preset: demands more confidence before acting
    ///
    /// - PROCEED at >= 0.90
    /// - HALT below 0.50
    /// - Strict weight names
    pub fn conservative() -> Self {
        Self {
            proceed_threshold: 0.90,
            hold_threshold: 0.50,
            target_hold_rate: 0.30,
            strict_weights: true,
            ..Self::default()
        }
    }

    /// Permissive preset: acts on weaker evidence
    ///
    /// - PROCEED at >= 0.70
    /// - HALT below 0.30
    pub fn permissive() -> Self {
        Self {
            proceed_threshold: 0.70,
            hold_threshold: 0.30,
            target_hold_rate: 0.10,
            ..Self::default()
        }
    }

    /// Set the domain tag
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Set both thresholds
    pub fn with_thresholds(mut self, proceed_threshold: f64, hold_threshold: f64) -> Self {
        self.proceed_threshold = proceed_threshold;
        self.hold_threshold = hold_threshold;
        self
    }

    /// Validate the configuration
    ///
    /// Out-of-range values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), EvaluatorError> {
        let invalid = |msg: String| Err(EvaluatorError::InvalidConfiguration(msg));

        if !(self.proceed_threshold > 0.0 && self.proceed_threshold <= 1.0) {
            return invalid(format!(
                "proceed_threshold {} must be in (0, 1]",
                self.proceed_threshold
            ));
        }
        if !(self.hold_threshold >= 0.0 && self.hold_threshold < self.proceed_threshold) {
            return invalid(format!(
                "hold_threshold {} must be in [0, proceed_threshold {})",
                self.hold_threshold, self.proceed_threshold
            ));
        }
        if !(self.target_hold_rate >= 0.0 && self.target_hold_rate <= 1.0) {
            return invalid(format!(
                "target_hold_rate {} must be in [0, 1]",
                self.target_hold_rate
            ));
        }
        if !(self.conflict_threshold.is_finite() && self.conflict_threshold >= 0.0) {
            return invalid(format!(
                "conflict_threshold {} must be a non-negative number",
                self.conflict_threshold
            ));
        }

        let normalizer = &self.normalizer;
        if !(normalizer.strong_magnitude.is_finite() && normalizer.strong_magnitude >= 0.0) {
            return invalid(format!(
                "normalizer.strong_magnitude {} must be a non-negative number",
                normalizer.strong_magnitude
            ));
        }
        for (field, value) in [
            ("strong_confidence", normalizer.strong_confidence),
            ("weak_confidence", normalizer.weak_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return invalid(format!("normalizer.{} {} must be in [0, 1]", field, value));
            }
        }

        Ok(())
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, EvaluatorError> {
        toml::from_str(toml_str).map_err(|e| {
            EvaluatorError::InvalidConfiguration(format!("Failed to parse TOML: {}", e))
        })
    }

    /// Serialize configuration to a TOML string
    pub fn to_toml(&self) -> Result<String, EvaluatorError> {
        toml::to_string_pretty(self).map_err(|e| {
            EvaluatorError::InvalidConfiguration(format!("Failed to serialize to TOML: {}", e))
        })
    }
}
