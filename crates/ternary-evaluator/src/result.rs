//! Evaluation result types

use crate::EvaluatorError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ternary_domain::{ConfidenceLevel, DecisionState, SignalConflict};

/// Bookkeeping attached to every evaluation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationMetadata {
    /// Missing signal names, in signal-set order
    pub missing: Vec<String>,

    /// Number of signals in the evaluated set
    pub signal_count: usize,

    /// Number of explicit weights supplied by the caller
    pub weight_count: usize,

    /// Number of missing signals
    pub missing_count: usize,

    /// Weighted average of present readings over the total weight
    pub weighted_value: f64,

    /// Sum of weights over every signal in the set
    pub total_weight: f64,

    /// Share of total weight carried by missing signals
    pub missing_weight_share: f64,

    /// Population variance of present readings
    pub value_variance: f64,

    /// Present signal with the largest |weight × value|
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dominant_signal: Option<String>,

    /// Opposing signal pairs
    #[serde(default)]
    pub conflicts: Vec<SignalConflict>,

    /// Caller-supplied context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    /// Engine domain tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

/// Outcome of one evaluation
///
/// Immutable once constructed. Construction checks that the confidence lies in
/// [0, 1] and that next steps are present exactly when the state is
/// EPISTEMIC_HOLD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ResultRecord", into = "ResultRecord")]
pub struct EvaluationResult {
    state: DecisionState,
    confidence: f64,
    reasoning: String,
    next_steps: Vec<String>,
    metadata: EvaluationMetadata,
    timestamp: DateTime<Utc>,
}

impl EvaluationResult {
    /// Create a result stamped with the current time
    ///
    /// # Examples
    ///
    /// ```
    /// use ternary_domain::DecisionState;
    /// use ternary_evaluator::{EvaluationMetadata, EvaluationResult};
    ///
    /// let result = EvaluationResult::new(
    ///     DecisionState::Proceed,
    ///     0.92,
    ///     "Strong market signals".to_string(),
    ///     Vec::new(),
    ///     EvaluationMetadata::default(),
    /// )
    /// .unwrap();
    /// assert_eq!(result.state().value(), 1);
    ///
    /// // Out-of-range confidence is rejected
    /// assert!(EvaluationResult::new(
    ///     DecisionState::Proceed,
    ///     1.2,
    ///     String::new(),
    ///     Vec::new(),
    ///     EvaluationMetadata::default(),
    /// )
    /// .is_err());
    /// ```
    pub fn new(
        state: DecisionState,
        confidence: f64,
        reasoning: String,
        next_steps: Vec<String>,
        metadata: EvaluationMetadata,
    ) -> Result<Self, EvaluatorError> {
        Self::with_timestamp(state, confidence, reasoning, next_steps, metadata, Utc::now())
    }

    /// Create a result with an explicit timestamp
    pub fn with_timestamp(
        state: DecisionState,
        confidence: f64,
        reasoning: String,
        next_steps: Vec<String>,
        metadata: EvaluationMetadata,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, EvaluatorError> {
        if !(0.0..=1.0).contains(&confidence) {
            return Err(EvaluatorError::InvalidResult(format!(
                "confidence {} is outside [0.0, 1.0]",
                confidence
            )));
        }

        let is_hold = state == DecisionState::Hold;
        if is_hold && next_steps.is_empty() {
            return Err(EvaluatorError::InvalidResult(
                "EPISTEMIC_HOLD requires at least one next step".to_string(),
            ));
        }
        if !is_hold && !next_steps.is_empty() {
            return Err(EvaluatorError::InvalidResult(format!(
                "{} must not carry next steps",
                state
            )));
        }

        Ok(Self {
            state,
            confidence,
            reasoning,
            next_steps,
            metadata,
            timestamp,
        })
    }

    /// Decision state
    pub fn state(&self) -> DecisionState {
        self.state
    }

    /// Aggregate confidence in [0, 1]
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Qualitative band of the confidence
    pub fn confidence_level(&self) -> ConfidenceLevel {
        ConfidenceLevel::classify(self.confidence)
    }

    /// Explanation of the decisive factor
    pub fn reasoning(&self) -> &str {
        &self.reasoning
    }

    /// Remediation steps (non-empty only for EPISTEMIC_HOLD)
    pub fn next_steps(&self) -> &[String] {
        &self.next_steps
    }

    /// Alias for [`next_steps`](Self::next_steps)
    pub fn clarifying_questions(&self) -> &[String] {
        &self.next_steps
    }

    /// Evaluation bookkeeping
    pub fn metadata(&self) -> &EvaluationMetadata {
        &self.metadata
    }

    /// When the result was produced
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Check whether this is an epistemic hold
    pub fn is_hold(&self) -> bool {
        self.state == DecisionState::Hold
    }

    /// Pretty-printed JSON form
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Serialized shape of an [`EvaluationResult`]
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ResultRecord {
    state: DecisionState,
    state_value: i8,
    confidence: f64,
    confidence_level: ConfidenceLevel,
    reasoning: String,
    #[serde(default)]
    next_steps: Vec<String>,
    metadata: EvaluationMetadata,
    timestamp: DateTime<Utc>,
}

impl From<EvaluationResult> for ResultRecord {
    fn from(result: EvaluationResult) -> Self {
        Self {
            state: result.state,
            state_value: result.state.value(),
            confidence: result.confidence,
            confidence_level: ConfidenceLevel::classify(result.confidence),
            reasoning: result.reasoning,
            next_steps: result.next_steps,
            metadata: result.metadata,
            timestamp: result.timestamp,
        }
    }
}

impl TryFrom<ResultRecord> for EvaluationResult {
    type Error = EvaluatorError;

    fn try_from(record: ResultRecord) -> Result<Self, Self::Error> {
        if record.state_value != record.state.value() {
            return Err(EvaluatorError::InvalidResult(format!(
                "state_value {} does not match state {}",
                record.state_value, record.state
            )));
        }
        Self::with_timestamp(
            record.state,
            record.confidence,
            record.reasoning,
            record.next_steps,
            record.metadata,
            record.timestamp,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hold_result() -> EvaluationResult {
        EvaluationResult::new(
            DecisionState::Hold,
            0.45,
            "Epistemic hold".to_string(),
            vec!["Gather missing signal 'volume'".to_string()],
            EvaluationMetadata {
                missing: vec!["volume".to_string()],
                missing_count: 1,
                signal_count: 4,
                ..Default::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn test_hold_requires_next_steps() {
        let result = EvaluationResult::new(
            DecisionState::Hold,
            0.5,
            String::new(),
            Vec::new(),
            EvaluationMetadata::default(),
        );
        assert!(matches!(result, Err(EvaluatorError::InvalidResult(_))));
    }

    #[test]
    fn test_decisive_state_rejects_next_steps() {
        let result = EvaluationResult::new(
            DecisionState::Halt,
            0.9,
            String::new(),
            vec!["step".to_string()],
            EvaluationMetadata::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_confidence_bounds() {
        for confidence in [-0.1, 1.01, f64::NAN] {
            let result = EvaluationResult::new(
                DecisionState::Halt,
                confidence,
                String::new(),
                Vec::new(),
                EvaluationMetadata::default(),
            );
            assert!(result.is_err(), "confidence {} should be rejected", confidence);
        }
    }

    #[test]
    fn test_json_field_names() {
        let json: serde_json::Value = serde_json::from_str(&hold_result().to_json().unwrap()).unwrap();
        assert_eq!(json["state"], "EPISTEMIC_HOLD");
        assert_eq!(json["state_value"], 0);
        assert_eq!(json["confidence"], 0.45);
        assert_eq!(json["confidence_level"], "low");
        assert_eq!(json["metadata"]["missing"][0], "volume");
        assert!(json["timestamp"].as_str().unwrap().contains('T'));
    }

    #[test]
    fn test_deserialize_checks_state_value() {
        let mut json: serde_json::Value = serde_json::to_value(hold_result()).unwrap();
        let parsed: EvaluationResult = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(parsed, hold_result_with_timestamp(parsed.timestamp()));

        json["state_value"] = serde_json::json!(1);
        assert!(serde_json::from_value::<EvaluationResult>(json).is_err());
    }

    fn hold_result_with_timestamp(timestamp: DateTime<Utc>) -> EvaluationResult {
        let base = hold_result();
        EvaluationResult::with_timestamp(
            base.state(),
            base.confidence(),
            base.reasoning().to_string(),
            base.next_steps().to_vec(),
            base.metadata().clone(),
            timestamp,
        )
        .unwrap()
    }
}
