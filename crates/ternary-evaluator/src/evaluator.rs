//! Ternary evaluation logic

use crate::hints::hints_for;
use crate::{EngineConfig, EvaluationMetadata, EvaluationResult, EvaluatorError};
use ternary_domain::{analyze_conflicts, normalize, ConflictAnalysis, DecisionState, Normalized, SignalSet, Weights};
use tracing::{debug, info};

/// Weighted aggregate of one signal set
#[derive(Debug, Clone, Default, PartialEq)]
struct Aggregate {
    total_weight: f64,
    missing_weight_share: f64,
    avg_value: f64,
    avg_confidence: f64,
    dominant: Option<Dominant>,
}

#[derive(Debug, Clone, PartialEq)]
struct Dominant {
    name: String,
    weight: f64,
    value: f64,
}

/// What decided the outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecisiveFactor {
    /// Empty signal set or zero total weight
    NoData,
    /// Confidence below the hold threshold
    InsufficientConfidence,
    /// Confidence between the thresholds
    Uncertain,
    /// Confident and the aggregate is positive
    PositiveAggregate,
    /// Confident and the aggregate is negative
    NegativeAggregate,
    /// Confident and the aggregate is exactly zero
    Tie,
}

impl DecisiveFactor {
    fn state(&self) -> DecisionState {
        match self {
            DecisiveFactor::NoData | DecisiveFactor::Uncertain => DecisionState::Hold,
            DecisiveFactor::PositiveAggregate => DecisionState::Proceed,
            DecisiveFactor::InsufficientConfidence
            | DecisiveFactor::NegativeAggregate
            | DecisiveFactor::Tie => DecisionState::Halt,
        }
    }
}

/// The ternary evaluator maps weighted signals to PROCEED, EPISTEMIC_HOLD or HALT
///
/// Confidence, not signal direction, gates whether a decision is forced:
///
/// | Aggregate confidence | Aggregate value | State |
/// |----------------------|-----------------|-------|
/// | `< hold_threshold` | any | HALT |
/// | `< proceed_threshold` | any | EPISTEMIC_HOLD |
/// | `>= proceed_threshold` | `> 0` | PROCEED |
/// | `>= proceed_threshold` | `<= 0` | HALT (a zero aggregate resolves to HALT) |
///
/// An empty signal set, or one whose total weight is zero, yields
/// EPISTEMIC_HOLD with confidence 0.
///
/// Stateless apart from its configuration; safe to share between threads.
///
/// # Examples
///
/// ```
/// use ternary_domain::{DecisionState, SignalSet, SignalValue, Weights};
/// use ternary_evaluator::TernaryEvaluator;
///
/// let evaluator = TernaryEvaluator::default_config();
/// let signals = SignalSet::new()
///     .with("market_sentiment", 0.3)
///     .with("technical", -0.4)
///     .with("volume", SignalValue::Missing)
///     .with("fundamentals", 0.2);
///
/// let result = evaluator.evaluate(&signals, &Weights::new(), "").unwrap();
/// assert_eq!(result.state(), DecisionState::Hold);
/// assert!(result.next_steps().iter().any(|s| s.contains("volume")));
/// ```
#[derive(Debug, Clone)]
pub struct TernaryEvaluator {
    config: EngineConfig,
}

impl TernaryEvaluator {
    /// Create an evaluator, rejecting invalid configuration
    pub fn new(config: EngineConfig) -> Result<Self, EvaluatorError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create an evaluator with default configuration
    pub fn default_config() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evaluate a signal set
    ///
    /// # Arguments
    ///
    /// * `signals` - Named readings, possibly missing
    /// * `weights` - Importance factors (unlisted signals weigh 1.0)
    /// * `context` - Free-form caller context, copied into the metadata
    ///
    /// # Errors
    ///
    /// Fails only on malformed input: non-finite readings, negative or
    /// non-finite weights, or (in strict mode) weights naming unknown signals.
    pub fn evaluate(
        &self,
        signals: &SignalSet,
        weights: &Weights,
        context: &str,
    ) -> Result<EvaluationResult, EvaluatorError> {
        self.validate_inputs(signals, weights)?;

        let normalized = normalize(signals, &self.config.normalizer);
        let aggregate = aggregate(&normalized, weights);
        let analysis = analyze_conflicts(&normalized, self.config.conflict_threshold);

        debug!(
            "Aggregated {} signals ({} missing): value={:.4}, confidence={:.4}, total_weight={:.4}",
            signals.len(),
            normalized.missing.len(),
            aggregate.avg_value,
            aggregate.avg_confidence,
            aggregate.total_weight
        );

        let factor = self.decide(signals, &aggregate);
        let state = factor.state();
        let reasoning = self.build_reasoning(factor, &normalized, &aggregate, &analysis, signals.is_empty());
        let next_steps = if state == DecisionState::Hold {
            self.build_next_steps(factor, &normalized, &aggregate, &analysis)
        } else {
            Vec::new()
        };

        let metadata = EvaluationMetadata {
            missing: normalized.missing.clone(),
            signal_count: signals.len(),
            weight_count: weights.len(),
            missing_count: normalized.missing.len(),
            weighted_value: aggregate.avg_value,
            total_weight: aggregate.total_weight,
            missing_weight_share: aggregate.missing_weight_share,
            value_variance: analysis.variance,
            dominant_signal: aggregate.dominant.as_ref().map(|d| d.name.clone()),
            conflicts: analysis.conflicts.clone(),
            context: (!context.is_empty()).then(|| context.to_string()),
            domain: self.config.domain.clone(),
        };

        info!(
            "Ternary decision: {} (confidence: {:.3})",
            state, aggregate.avg_confidence
        );

        EvaluationResult::new(state, aggregate.avg_confidence, reasoning, next_steps, metadata)
    }

    /// Reject malformed readings and weights before any aggregation
    fn validate_inputs(&self, signals: &SignalSet, weights: &Weights) -> Result<(), EvaluatorError> {
        for signal in signals.iter() {
            if let Some(value) = signal.value.value() {
                if !value.is_finite() {
                    return Err(EvaluatorError::InvalidSignalValue {
                        name: signal.name.clone(),
                        value,
                    });
                }
            }
        }

        // Weights for names outside the signal set never take part
        for (name, weight) in weights.iter().filter(|(name, _)| signals.contains(name)) {
            if !weight.is_finite() || weight < 0.0 {
                return Err(EvaluatorError::InvalidWeight {
                    name: name.to_string(),
                    weight,
                });
            }
        }

        if self.config.strict_weights {
            if let Some(unknown) = weights.unknown_names(signals).first() {
                return Err(EvaluatorError::UnknownWeight(unknown.to_string()));
            }
        }

        Ok(())
    }

    /// Apply threshold policy
    fn decide(&self, signals: &SignalSet, aggregate: &Aggregate) -> DecisiveFactor {
        if signals.is_empty() || aggregate.total_weight <= 0.0 {
            return DecisiveFactor::NoData;
        }

        let confidence = aggregate.avg_confidence;
        if confidence < self.config.hold_threshold {
            DecisiveFactor::InsufficientConfidence
        } else if confidence < self.config.proceed_threshold {
            DecisiveFactor::Uncertain
        } else if aggregate.avg_value > 0.0 {
            DecisiveFactor::PositiveAggregate
        } else if aggregate.avg_value == 0.0 {
            // Conservative tie-break
            DecisiveFactor::Tie
        } else {
            DecisiveFactor::NegativeAggregate
        }
    }

    fn threshold_clause(&self, confidence: f64) -> String {
        let verdict = |met: bool| if met { "met" } else { "failed" };
        format!(
            "confidence {:.2} {} the hold threshold {:.2} and {} the proceed threshold {:.2}",
            confidence,
            verdict(confidence >= self.config.hold_threshold),
            self.config.hold_threshold,
            verdict(confidence >= self.config.proceed_threshold),
            self.config.proceed_threshold
        )
    }

    fn build_reasoning(
        &self,
        factor: DecisiveFactor,
        normalized: &Normalized,
        aggregate: &Aggregate,
        analysis: &ConflictAnalysis,
        empty: bool,
    ) -> String {
        let clause = self.threshold_clause(aggregate.avg_confidence);
        let value = aggregate.avg_value;

        let mut parts = vec![match factor {
            DecisiveFactor::NoData if empty => format!(
                "Epistemic hold: no data to evaluate (empty signal set); {}.",
                clause
            ),
            DecisiveFactor::NoData => format!(
                "Epistemic hold: no data to evaluate (total signal weight is zero); {}.",
                clause
            ),
            DecisiveFactor::InsufficientConfidence => format!(
                "Halt: evidence is insufficient; {}.",
                clause
            ),
            DecisiveFactor::Uncertain => format!(
                "Epistemic hold: {}; signal direction (weighted value {:+.2}) is not decisive at this confidence.",
                clause, value
            ),
            DecisiveFactor::PositiveAggregate => format!(
                "Proceed: {}; weighted value {:+.2} is positive.",
                clause, value
            ),
            DecisiveFactor::NegativeAggregate => format!(
                "Halt: {}; weighted value {:+.2} is negative.",
                clause, value
            ),
            DecisiveFactor::Tie => format!(
                "Halt: {}; weighted value is exactly 0.00, tie resolved to HALT.",
                clause
            ),
        }];

        if !normalized.missing.is_empty() {
            parts.push(format!(
                "Missing signals: {} ({:.0}% of total weight).",
                normalized.missing.join(", "),
                aggregate.missing_weight_share * 100.0
            ));
        }

        if let Some(dominant) = &aggregate.dominant {
            parts.push(format!(
                "Dominant signal: {} (weight {:.2}, value {:+.2}).",
                dominant.name, dominant.weight, dominant.value
            ));
        }

        if analysis.has_conflicts() {
            let described: Vec<String> = analysis.conflicts.iter().map(|c| c.describe()).collect();
            parts.push(format!("Conflicting signals: {}.", described.join("; ")));
        }

        parts.join(" ")
    }

    fn build_next_steps(
        &self,
        factor: DecisiveFactor,
        normalized: &Normalized,
        aggregate: &Aggregate,
        analysis: &ConflictAnalysis,
    ) -> Vec<String> {
        let proceed = self.config.proceed_threshold;
        let mut steps: Vec<String> = normalized
            .missing
            .iter()
            .map(|name| format!("Gather missing signal '{}' and re-submit the evaluation", name))
            .collect();

        if factor == DecisiveFactor::NoData {
            steps.push("Supply at least one signal with a non-zero weight".to_string());
        }

        steps.push(format!(
            "Confidence {:.2} is {:.2} below the proceed threshold {:.2}",
            aggregate.avg_confidence,
            proceed - aggregate.avg_confidence,
            proceed
        ));

        steps.extend(
            analysis
                .conflicts
                .iter()
                .map(|c| format!("Resolve conflicting signals '{}' and '{}'", c.first, c.second)),
        );

        steps.push(format!(
            "Re-evaluate when new data raises confidence to at least {:.2}",
            proceed
        ));

        steps.extend(hints_for(&self.config));
        steps
    }
}

/// Weighted combination of normalized signals
///
/// Every signal's weight counts toward the total; only present signals add to
/// the value and confidence sums, so missing data drags confidence down.
/// Sums run over weights divided by the largest weight, so huge finite weights
/// cannot overflow them. The reported total saturates at `f64::MAX`.
fn aggregate(normalized: &Normalized, weights: &Weights) -> Aggregate {
    let scale = normalized
        .contributions
        .iter()
        .map(|c| weights.weight_for(&c.name))
        .fold(0.0, f64::max);
    if scale <= 0.0 {
        return Aggregate::default();
    }

    let mut raw_total = 0.0;
    let mut total = 0.0;
    let mut missing = 0.0;
    let mut weighted_value = 0.0;
    let mut weighted_confidence = 0.0;
    let mut dominant: Option<(f64, Dominant)> = None;

    for contribution in &normalized.contributions {
        let weight = weights.weight_for(&contribution.name);
        let scaled = weight / scale;
        raw_total += weight;
        total += scaled;

        let Some(value) = contribution.value else {
            missing += scaled;
            continue;
        };

        weighted_value += scaled * value;
        weighted_confidence += scaled * contribution.local_confidence;

        let strength = (scaled * value).abs();
        let stronger = match &dominant {
            Some((current, _)) => strength > *current,
            None => strength > 0.0,
        };
        if stronger {
            dominant = Some((
                strength,
                Dominant {
                    name: contribution.name.clone(),
                    weight,
                    value,
                },
            ));
        }
    }

    Aggregate {
        total_weight: f64::min(raw_total, f64::MAX),
        missing_weight_share: missing / total,
        avg_value: weighted_value / total,
        avg_confidence: (weighted_confidence / total).clamp(0.0, 1.0),
        dominant: dominant.map(|(_, d)| d),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ternary_domain::SignalValue;

    fn evaluator() -> TernaryEvaluator {
        TernaryEvaluator::default_config()
    }

    fn scenario_b() -> SignalSet {
        SignalSet::new()
            .with("market_sentiment", 0.3)
            .with("technical", -0.4)
            .with("volume", SignalValue::Missing)
            .with("fundamentals", 0.2)
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EngineConfig::default().with_thresholds(0.5, 0.7);
        assert!(matches!(
            TernaryEvaluator::new(config),
            Err(EvaluatorError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_aggregate_counts_missing_weight() {
        let normalized = normalize(&scenario_b(), &Default::default());
        let agg = aggregate(&normalized, &Weights::new());

        assert_eq!(agg.total_weight, 4.0);
        assert_eq!(agg.missing_weight_share, 0.25);
        assert!((agg.avg_confidence - 0.45).abs() < 1e-9);
        assert!((agg.avg_value - 0.025).abs() < 1e-9);
        assert_eq!(agg.dominant.as_ref().map(|d| d.name.as_str()), Some("technical"));
    }

    #[test]
    fn test_weights_for_absent_names_are_ignored() {
        let normalized = normalize(&scenario_b(), &Default::default());
        let with_extra = aggregate(&normalized, &Weights::new().with("liquidity", 10.0));
        let plain = aggregate(&normalized, &Weights::new());
        assert_eq!(with_extra, plain);
    }

    #[test]
    fn test_below_hold_threshold_halts() {
        // Two missing, one moderate: confidence 0.6 / 3 = 0.2
        let signals = SignalSet::new()
            .with("a", 0.3)
            .with("b", SignalValue::Missing)
            .with("c", SignalValue::Missing);
        let result = evaluator().evaluate(&signals, &Weights::new(), "").unwrap();

        assert_eq!(result.state(), DecisionState::Halt);
        assert!(result.next_steps().is_empty());
        assert!(result.reasoning().contains("failed the hold threshold"));
        assert!(result.reasoning().contains("b, c"));
    }

    #[test]
    fn test_tie_resolves_to_halt() {
        let signals = SignalSet::new().with("up", 0.8).with("down", -0.8);
        let result = evaluator().evaluate(&signals, &Weights::new(), "").unwrap();

        assert_eq!(result.confidence(), 1.0);
        assert_eq!(result.state(), DecisionState::Halt);
        assert!(result.reasoning().contains("tie resolved to HALT"));
    }

    #[test]
    fn test_zero_total_weight_holds() {
        let signals = SignalSet::new().with("a", 0.9);
        let weights = Weights::new().with("a", 0.0);
        let result = evaluator().evaluate(&signals, &weights, "").unwrap();

        assert_eq!(result.state(), DecisionState::Hold);
        assert_eq!(result.confidence(), 0.0);
        assert!(result.reasoning().contains("total signal weight is zero"));
    }

    #[test]
    fn test_non_finite_signal_rejected() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let signals = SignalSet::new().with("a", 0.2).with("b", bad);
            match evaluator().evaluate(&signals, &Weights::new(), "") {
                Err(EvaluatorError::InvalidSignalValue { name, .. }) => assert_eq!(name, "b"),
                other => panic!("Expected InvalidSignalValue, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_negative_weight_rejected() {
        let signals = SignalSet::new().with("a", 0.2);
        let weights = Weights::new().with("a", -1.0);
        assert!(matches!(
            evaluator().evaluate(&signals, &weights, ""),
            Err(EvaluatorError::InvalidWeight { .. })
        ));
    }

    #[test]
    fn test_weight_for_absent_name_not_validated() {
        let signals = SignalSet::new().with("a", 0.9);
        let weights = Weights::new().with("unrelated", -1.0).with("other", f64::NAN);
        let result = evaluator().evaluate(&signals, &weights, "").unwrap();
        assert_eq!(result.state(), DecisionState::Proceed);
    }

    #[test]
    fn test_huge_weights_do_not_overflow() {
        let signals = SignalSet::new().with("a", 1.0).with("b", 1.0);
        let weights = Weights::new().with("a", 1e308).with("b", 1e308);
        let result = evaluator().evaluate(&signals, &weights, "").unwrap();

        assert_eq!(result.state(), DecisionState::Proceed);
        assert_eq!(result.confidence(), 1.0);
        assert_eq!(result.metadata().total_weight, f64::MAX);
        assert!((result.metadata().weighted_value - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_huge_weight_skew_matches_small_weights() {
        let small = Weights::new().with("market_sentiment", 5.0);
        let huge = Weights::new()
            .with("market_sentiment", 5e307)
            .with("technical", 1e307)
            .with("volume", 1e307)
            .with("fundamentals", 1e307);
        let a = evaluator().evaluate(&scenario_b(), &small, "").unwrap();
        let b = evaluator().evaluate(&scenario_b(), &huge, "").unwrap();

        assert_eq!(a.state(), b.state());
        assert!((a.confidence() - b.confidence()).abs() < 1e-9);
        assert_eq!(b.metadata().dominant_signal.as_deref(), Some("market_sentiment"));
    }

    #[test]
    fn test_strict_weights() {
        let mut config = EngineConfig::default();
        config.strict_weights = true;
        let strict = TernaryEvaluator::new(config).unwrap();

        let signals = SignalSet::new().with("technical", 0.9);
        let weights = Weights::new().with("tecnical", 2.0);

        assert_eq!(
            strict.evaluate(&signals, &weights, ""),
            Err(EvaluatorError::UnknownWeight("tecnical".to_string()))
        );
        assert!(evaluator().evaluate(&signals, &weights, "").is_ok());
    }

    #[test]
    fn test_hold_next_steps() {
        let result = evaluator().evaluate(&scenario_b(), &Weights::new(), "").unwrap();
        let steps = result.next_steps();

        assert_eq!(steps[0], "Gather missing signal 'volume' and re-submit the evaluation");
        assert!(steps.iter().any(|s| s.contains("0.40 below the proceed threshold 0.85")));
        assert!(steps.iter().any(|s| s.starts_with("Re-evaluate when")));
        assert!(steps.iter().any(|s| s.contains("'market_sentiment' and 'technical'")));
    }

    #[test]
    fn test_domain_hints_appended() {
        let config = EngineConfig::default().with_domain("medical");
        let result = TernaryEvaluator::new(config)
            .unwrap()
            .evaluate(&scenario_b(), &Weights::new(), "")
            .unwrap();

        assert_eq!(
            result.next_steps().last().map(String::as_str),
            Some("Review patient history for additional context")
        );
        assert_eq!(result.metadata().domain.as_deref(), Some("medical"));
    }

    #[test]
    fn test_metadata() {
        let weights = Weights::new().with("technical", 2.0);
        let result = evaluator().evaluate(&scenario_b(), &weights, "BTC rebalance").unwrap();
        let metadata = result.metadata();

        assert_eq!(metadata.missing, vec!["volume".to_string()]);
        assert_eq!(metadata.signal_count, 4);
        assert_eq!(metadata.weight_count, 1);
        assert_eq!(metadata.missing_count, 1);
        assert_eq!(metadata.total_weight, 5.0);
        assert!((metadata.missing_weight_share - 0.2).abs() < 1e-9);
        assert_eq!(metadata.context.as_deref(), Some("BTC rebalance"));
        assert_eq!(metadata.conflicts.len(), 2);
    }

    #[test]
    fn test_empty_context_not_recorded() {
        let result = evaluator().evaluate(&scenario_b(), &Weights::new(), "").unwrap();
        assert!(result.metadata().context.is_none());
    }
}
