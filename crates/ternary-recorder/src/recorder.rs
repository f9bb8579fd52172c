//! Decision recorder: history, hold events and statistics

use crate::{DecisionStatistics, HoldEvent, RecorderError, UncertaintyMetrics};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard};
use ternary_domain::{SignalSet, Weights};
use ternary_evaluator::{EngineConfig, EvaluationResult, TernaryEvaluator};

/// One entry of the decision history
///
/// Serializes as the evaluation result's fields followed by the inputs that
/// produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    /// The evaluation outcome
    #[serde(flatten)]
    pub result: EvaluationResult,

    /// Signals the evaluation was run on
    pub signals: SignalSet,

    /// Weights in force
    pub weights: Weights,

    /// Caller context, if any
    #[serde(default)]
    pub context: Option<String>,
}

#[derive(Debug, Default)]
struct RecorderState {
    history: Vec<DecisionRecord>,
    hold_events: Vec<HoldEvent>,
    sequence: u64,
}

/// Wraps an evaluator with an append-only decision history
///
/// Every operation takes `&self`; history and hold events sit behind one
/// mutex, so a recorder can be shared across threads in an `Arc`.
///
/// # Examples
///
/// ```
/// use ternary_domain::{DecisionState, SignalSet, SignalValue, Weights};
/// use ternary_recorder::DecisionRecorder;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let recorder = DecisionRecorder::default_config();
/// let signals = SignalSet::new()
///     .with("market_sentiment", 0.3)
///     .with("technical", -0.4)
///     .with("volume", SignalValue::Missing)
///     .with("fundamentals", 0.2);
///
/// let result = recorder.decide(&signals, &Weights::new(), "ETH review")?;
/// assert_eq!(result.state(), DecisionState::Hold);
///
/// let hold = &recorder.unresolved_holds()?[0];
/// recorder.resolve_hold(&hold.event_id, "waited for volume data")?;
///
/// let stats = recorder.summary()?;
/// assert_eq!(stats.hold_count, 1);
/// assert_eq!(stats.unresolved_holds, 0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct DecisionRecorder {
    evaluator: TernaryEvaluator,
    state: Mutex<RecorderState>,
}

impl DecisionRecorder {
    /// Create a recorder around the given evaluator
    pub fn new(evaluator: TernaryEvaluator) -> Self {
        Self {
            evaluator,
            state: Mutex::new(RecorderState::default()),
        }
    }

    /// Create a recorder with the default engine configuration
    pub fn default_config() -> Self {
        Self::new(TernaryEvaluator::default_config())
    }

    /// The wrapped evaluator
    pub fn evaluator(&self) -> &TernaryEvaluator {
        &self.evaluator
    }

    /// Engine configuration of the wrapped evaluator
    pub fn config(&self) -> &EngineConfig {
        self.evaluator.config()
    }

    fn lock(&self) -> Result<MutexGuard<'_, RecorderState>, RecorderError> {
        self.state.lock().map_err(|_| RecorderError::Poisoned)
    }

    /// Evaluate and record in one step
    ///
    /// Nothing is recorded when evaluation fails.
    pub fn decide(
        &self,
        signals: &SignalSet,
        weights: &Weights,
        context: &str,
    ) -> Result<EvaluationResult, RecorderError> {
        let result = self.evaluator.evaluate(signals, weights, context)?;
        self.record(result.clone(), signals, weights, context)?;
        Ok(result)
    }

    /// Append a result to the history
    ///
    /// An EPISTEMIC_HOLD result also opens a [`HoldEvent`]; its id is
    /// returned so the caller can resolve it later.
    pub fn record(
        &self,
        result: EvaluationResult,
        signals: &SignalSet,
        weights: &Weights,
        context: &str,
    ) -> Result<Option<String>, RecorderError> {
        let context = (!context.is_empty()).then(|| context.to_string());
        let mut state = self.lock()?;
        state.sequence += 1;

        tracing::debug!(
            "Recording decision #{}: {} (confidence {:.3})",
            state.sequence,
            result.state(),
            result.confidence()
        );

        let hold_id = if result.is_hold() {
            let event = self.open_hold(&result, signals, weights, context.clone(), state.sequence);
            tracing::warn!(
                "Epistemic hold {} opened at confidence {:.3}",
                event.event_id,
                event.uncertainty_metrics.confidence
            );
            let id = event.event_id.clone();
            state.hold_events.push(event);
            Some(id)
        } else {
            None
        };

        state.history.push(DecisionRecord {
            result,
            signals: signals.clone(),
            weights: weights.clone(),
            context,
        });

        Ok(hold_id)
    }

    fn open_hold(
        &self,
        result: &EvaluationResult,
        signals: &SignalSet,
        weights: &Weights,
        context: Option<String>,
        sequence: u64,
    ) -> HoldEvent {
        let config = self.config();
        let metadata = result.metadata();
        let confidence = result.confidence();

        let metrics = UncertaintyMetrics {
            confidence,
            distance_to_proceed_threshold: (config.proceed_threshold - confidence).abs(),
            distance_to_hold_threshold: (confidence - config.hold_threshold).abs(),
            missing_weight_share: metadata.missing_weight_share,
            value_variance: metadata.value_variance,
        };

        HoldEvent::open(
            result.reasoning().to_string(),
            signals.clone(),
            weights.clone(),
            context,
            metadata.conflicts.iter().map(|c| c.describe()).collect(),
            metrics,
            sequence,
        )
    }

    /// Attach a resolution action to a hold event
    ///
    /// Resolving twice keeps the later action.
    pub fn resolve_hold(&self, event_id: &str, action: &str) -> Result<(), RecorderError> {
        let mut state = self.lock()?;
        let event = state
            .hold_events
            .iter_mut()
            .find(|e| e.event_id == event_id)
            .ok_or_else(|| RecorderError::NotFound(event_id.to_string()))?;
        event.resolve(action);
        Ok(())
    }

    /// Statistics over everything recorded so far
    pub fn summary(&self) -> Result<DecisionStatistics, RecorderError> {
        let state = self.lock()?;
        Ok(DecisionStatistics::compute(
            &state.history,
            &state.hold_events,
            self.config(),
        ))
    }

    /// Snapshot of the decision history, oldest first
    pub fn history(&self) -> Result<Vec<DecisionRecord>, RecorderError> {
        Ok(self.lock()?.history.clone())
    }

    /// Snapshot of every hold event, oldest first
    pub fn hold_events(&self) -> Result<Vec<HoldEvent>, RecorderError> {
        Ok(self.lock()?.hold_events.clone())
    }

    /// Look up one hold event by id
    pub fn hold_event(&self, event_id: &str) -> Result<HoldEvent, RecorderError> {
        self.lock()?
            .hold_events
            .iter()
            .find(|e| e.event_id == event_id)
            .cloned()
            .ok_or_else(|| RecorderError::NotFound(event_id.to_string()))
    }

    /// Hold events still awaiting resolution
    pub fn unresolved_holds(&self) -> Result<Vec<HoldEvent>, RecorderError> {
        Ok(self
            .lock()?
            .hold_events
            .iter()
            .filter(|e| e.is_open())
            .cloned()
            .collect())
    }

    /// Number of recorded decisions
    pub fn len(&self) -> Result<usize, RecorderError> {
        Ok(self.lock()?.history.len())
    }

    /// Check whether nothing has been recorded
    pub fn is_empty(&self) -> Result<bool, RecorderError> {
        Ok(self.len()? == 0)
    }

    pub(crate) fn with_state<T>(
        &self,
        f: impl FnOnce(&[DecisionRecord], &[HoldEvent]) -> T,
    ) -> Result<T, RecorderError> {
        let state = self.lock()?;
        Ok(f(&state.history, &state.hold_events))
    }
}
