//! Summary statistics over the decision history

use crate::recorder::DecisionRecord;
use crate::HoldEvent;
use serde::{Deserialize, Serialize};
use ternary_domain::DecisionState;
use ternary_evaluator::EngineConfig;

/// Counts and rates over every recorded decision
///
/// On an empty history every count and rate is zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecisionStatistics {
    /// Number of recorded decisions
    pub total_decisions: usize,

    /// PROCEED decisions
    pub proceed_count: usize,

    /// EPISTEMIC_HOLD decisions
    pub hold_count: usize,

    /// HALT decisions
    pub halt_count: usize,

    /// proceed_count / total_decisions
    pub proceed_rate: f64,

    /// hold_count / total_decisions
    pub hold_rate: f64,

    /// halt_count / total_decisions
    pub halt_rate: f64,

    /// Mean confidence across decisions
    pub average_confidence: f64,

    /// Configured expected hold rate
    pub target_hold_rate: f64,

    /// Whether the observed hold rate is above the target
    pub hold_rate_exceeds_target: bool,

    /// Hold events opened
    pub hold_events: usize,

    /// Hold events not yet resolved
    pub unresolved_holds: usize,

    /// Engine domain tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

impl DecisionStatistics {
    /// Compute statistics from a history and its hold events
    pub fn compute(history: &[DecisionRecord], hold_events: &[HoldEvent], config: &EngineConfig) -> Self {
        let mut stats = Self {
            total_decisions: history.len(),
            target_hold_rate: config.target_hold_rate,
            hold_events: hold_events.len(),
            unresolved_holds: hold_events.iter().filter(|e| e.is_open()).count(),
            domain: config.domain.clone(),
            ..Default::default()
        };

        if history.is_empty() {
            return stats;
        }

        let mut confidence_sum = 0.0;
        for record in history {
            match record.result.state() {
                DecisionState::Proceed => stats.proceed_count += 1,
                DecisionState::Hold => stats.hold_count += 1,
                DecisionState::Halt => stats.halt_count += 1,
            }
            confidence_sum += record.result.confidence();
        }

        let total = history.len() as f64;
        stats.proceed_rate = stats.proceed_count as f64 / total;
        stats.hold_rate = stats.hold_count as f64 / total;
        stats.halt_rate = stats.halt_count as f64 / total;
        stats.average_confidence = confidence_sum / total;
        stats.hold_rate_exceeds_target = stats.hold_rate > stats.target_hold_rate;
        stats
    }

    /// Count for one state
    pub fn count(&self, state: DecisionState) -> usize {
        match state {
            DecisionState::Proceed => self.proceed_count,
            DecisionState::Hold => self.hold_count,
            DecisionState::Halt => self.halt_count,
        }
    }

    /// Rate for one state
    pub fn rate(&self, state: DecisionState) -> f64 {
        match state {
            DecisionState::Proceed => self.proceed_rate,
            DecisionState::Hold => self.hold_rate,
            DecisionState::Halt => self.halt_rate,
        }
    }

    /// Generate a plain-text summary report
    pub fn report(&self) -> String {
        let mut lines = vec![
            "Decision Statistics".to_string(),
            "===================".to_string(),
            format!("Total decisions: {}", self.total_decisions),
        ];

        if let Some(domain) = &self.domain {
            lines.push(format!("Domain: {}", domain));
        }
        lines.push(String::new());

        for state in DecisionState::ALL {
            lines.push(format!(
                "  {:<15} {:>5}  ({:.1}%)",
                state.as_str(),
                self.count(state),
                self.rate(state) * 100.0
            ));
        }

        lines.push(String::new());
        lines.push(format!("Average confidence: {:.3}", self.average_confidence));
        lines.push(format!(
            "Hold rate: {:.1}% (target {:.1}%){}",
            self.hold_rate * 100.0,
            self.target_hold_rate * 100.0,
            if self.hold_rate_exceeds_target { " - above target" } else { "" }
        ));
        lines.push(format!(
            "Hold events: {} ({} unresolved)",
            self.hold_events, self.unresolved_holds
        ));

        lines.join("\n")
    }
}
