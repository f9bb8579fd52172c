//! Signal conflict analysis
//!
//! Two present signals conflict when they point in opposite directions and
//! their readings are at least `conflict_threshold` apart.

use crate::normalizer::Normalized;
use serde::{Deserialize, Serialize};

/// Default minimum distance between opposing readings (default: 0.3)
pub const CONFLICT_THRESHOLD: f64 = 0.3;

/// A pair of opposing signals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalConflict {
    /// First signal (earlier in signal-set order)
    pub first: String,
    /// Second signal
    pub second: String,
    /// Absolute difference between the two readings
    pub difference: f64,
}

impl SignalConflict {
    /// Human-readable description, e.g. `market_sentiment vs technical (0.70 apart)`
    pub fn describe(&self) -> String {
        format!("{} vs {} ({:.2} apart)", self.first, self.second, self.difference)
    }
}

/// Dispersion and conflicts across the present signals of one evaluation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConflictAnalysis {
    /// Opposing pairs, in signal-set order
    pub conflicts: Vec<SignalConflict>,
    /// Population variance of present readings (0.0 for fewer than two)
    pub variance: f64,
}

impl ConflictAnalysis {
    /// Check whether any conflict was found
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }
}

/// Analyze normalized signals for opposing pairs and dispersion
pub fn analyze_conflicts(normalized: &Normalized, conflict_threshold: f64) -> ConflictAnalysis {
    let present: Vec<(&str, f64)> = normalized
        .present()
        .filter_map(|c| c.value.map(|v| (c.name.as_str(), v)))
        .collect();

    let mut conflicts = Vec::new();
    for (i, (first, a)) in present.iter().enumerate() {
        for (second, b) in &present[i + 1..] {
            let difference = (a - b).abs();
            if a * b < 0.0 && difference >= conflict_threshold {
                conflicts.push(SignalConflict {
                    first: first.to_string(),
                    second: second.to_string(),
                    difference,
                });
            }
        }
    }

    let variance = if present.len() < 2 {
        0.0
    } else {
        let n = present.len() as f64;
        let mean = present.iter().map(|(_, v)| v).sum::<f64>() / n;
        present.iter().map(|(_, v)| (v - mean).powi(2)).sum::<f64>() / n
    };

    ConflictAnalysis { conflicts, variance }
}
