//! Signal normalization
//!
//! Converts a [`SignalSet`] into per-signal confidence contributions and the
//! ordered list of missing signals. Pure function of its input.

use crate::signal::{SignalSet, SignalValue};
use serde::{Deserialize, Serialize};

/// Magnitude above which a signal counts as strong (default: 0.5)
pub const STRONG_MAGNITUDE: f64 = 0.5;

/// Local confidence for strong signals (default: 1.0)
pub const STRONG_CONFIDENCE: f64 = 1.0;

/// Local confidence for moderate signals (default: 0.6)
pub const WEAK_CONFIDENCE: f64 = 0.6;

/// Configuration for the local-confidence step
///
/// Moderate-magnitude signals are trusted less than strong ones. The
/// comparison is strict: a reading of exactly `strong_magnitude` is moderate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Magnitude threshold (strict `>`) for a strong signal
    #[serde(default = "default_strong_magnitude")]
    pub strong_magnitude: f64,
    /// Confidence assigned to strong signals
    #[serde(default = "default_strong_confidence")]
    pub strong_confidence: f64,
    /// Confidence assigned to moderate signals
    #[serde(default = "default_weak_confidence")]
    pub weak_confidence: f64,
}

fn default_strong_magnitude() -> f64 {
    STRONG_MAGNITUDE
}

fn default_strong_confidence() -> f64 {
    STRONG_CONFIDENCE
}

fn default_weak_confidence() -> f64 {
    WEAK_CONFIDENCE
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            strong_magnitude: STRONG_MAGNITUDE,
            strong_confidence: STRONG_CONFIDENCE,
            weak_confidence: WEAK_CONFIDENCE,
        }
    }
}

impl NormalizerConfig {
    /// Local confidence for a present reading
    pub fn local_confidence(&self, value: f64) -> f64 {
        if value.abs() > self.strong_magnitude {
            self.strong_confidence
        } else {
            self.weak_confidence
        }
    }
}

/// Normalized contribution of one signal
#[derive(Debug, Clone, PartialEq)]
pub struct Contribution {
    /// Signal name
    pub name: String,
    /// Reading, `None` when missing
    pub value: Option<f64>,
    /// Local confidence (0.0 for missing signals)
    pub local_confidence: f64,
}

impl Contribution {
    /// Check whether the contribution comes from a missing signal
    pub fn is_missing(&self) -> bool {
        self.value.is_none()
    }
}

/// Output of [`normalize`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    /// One contribution per signal, in signal-set order
    pub contributions: Vec<Contribution>,
    /// Names of missing signals, in signal-set order
    pub missing: Vec<String>,
}

impl Normalized {
    /// Contributions that carry a reading
    pub fn present(&self) -> impl Iterator<Item = &Contribution> {
        self.contributions.iter().filter(|c| !c.is_missing())
    }
}

/// Normalize a signal set
///
/// Missing data is an expected case: missing signals get local confidence
/// 0.0 and are listed in `missing`. Never fails.
///
/// # Examples
///
/// ```
/// use ternary_domain::{normalize, NormalizerConfig, SignalSet, SignalValue};
///
/// let signals = SignalSet::new()
///     .with("technical", 0.8)
///     .with("volume", SignalValue::Missing);
/// let normalized = normalize(&signals, &NormalizerConfig::default());
///
/// assert_eq!(normalized.contributions[0].local_confidence, 1.0);
/// assert_eq!(normalized.contributions[1].local_confidence, 0.0);
/// assert_eq!(normalized.missing, vec!["volume".to_string()]);
/// ```
pub fn normalize(signals: &SignalSet, config: &NormalizerConfig) -> Normalized {
    let mut normalized = Normalized::default();

    for signal in signals.iter() {
        let contribution = match signal.value {
            SignalValue::Present(value) => Contribution {
                name: signal.name.clone(),
                value: Some(value),
                local_confidence: config.local_confidence(value),
            },
            SignalValue::Missing => {
                normalized.missing.push(signal.name.clone());
                Contribution {
                    name: signal.name.clone(),
                    value: None,
                    local_confidence: 0.0,
                }
            }
        };
        normalized.contributions.push(contribution);
    }

    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strong_and_moderate_signals() {
        let config = NormalizerConfig::default();
        assert_eq!(config.local_confidence(0.9), 1.0);
        assert_eq!(config.local_confidence(-0.51), 1.0);
        assert_eq!(config.local_confidence(0.3), 0.6);
        assert_eq!(config.local_confidence(0.0), 0.6);
    }

    #[test]
    fn test_boundary_is_moderate() {
        let config = NormalizerConfig::default();
        assert_eq!(config.local_confidence(0.5), 0.6);
        assert_eq!(config.local_confidence(-0.5), 0.6);
    }

    #[test]
    fn test_missing_tracking() {
        let signals = SignalSet::new()
            .with("a", SignalValue::Missing)
            .with("b", 0.7)
            .with("c", SignalValue::Missing);
        let normalized = normalize(&signals, &NormalizerConfig::default());

        assert_eq!(normalized.missing, vec!["a".to_string(), "c".to_string()]);
        assert_eq!(normalized.contributions.len(), 3);
        assert_eq!(normalized.present().count(), 1);
        assert!(normalized.contributions[0].is_missing());
    }

    #[test]
    fn test_empty_set() {
        let normalized = normalize(&SignalSet::new(), &NormalizerConfig::default());
        assert!(normalized.contributions.is_empty());
        assert!(normalized.missing.is_empty());
    }

    #[test]
    fn test_custom_config() {
        let config = NormalizerConfig {
            strong_magnitude: 0.2,
            strong_confidence: 0.9,
            weak_confidence: 0.5,
        };
        assert_eq!(config.local_confidence(0.3), 0.9);
        assert_eq!(config.local_confidence(0.1), 0.5);
    }
}
