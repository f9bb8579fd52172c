//! Epistemic hold events
//!
//! One event is opened for every EPISTEMIC_HOLD result. An event starts
//! `Open` and becomes `Resolved` once a resolution action is attached.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use ternary_domain::{SignalSet, Weights};

/// Length of a hold event id in hex characters
pub const EVENT_ID_LEN: usize = 16;

/// Lifecycle of a hold event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HoldStatus {
    /// Created, awaiting resolution
    Open,
    /// A resolution action has been recorded
    Resolved,
}

/// How far a hold sat from a decisive outcome
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct UncertaintyMetrics {
    /// Aggregate confidence of the held evaluation
    pub confidence: f64,
    /// |proceed_threshold - confidence|
    pub distance_to_proceed_threshold: f64,
    /// |confidence - hold_threshold|
    pub distance_to_hold_threshold: f64,
    /// Share of total weight carried by missing signals
    pub missing_weight_share: f64,
    /// Population variance of present readings
    pub value_variance: f64,
}

/// Audit record of one epistemic hold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldEvent {
    /// Content-derived id (see [`HoldEvent::generate_id`])
    pub event_id: String,

    /// Reasoning of the evaluation that triggered the hold
    pub trigger_reason: String,

    /// Snapshot of the triggering signals
    pub signals: SignalSet,

    /// Snapshot of the weights in force
    pub weights: Weights,

    /// Caller context, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    /// Descriptions of opposing signal pairs
    #[serde(default)]
    pub signal_conflicts: Vec<String>,

    /// Distance-to-threshold and dispersion figures
    pub uncertainty_metrics: UncertaintyMetrics,

    /// Action taken to resolve the hold
    pub resolution_action: Option<String>,

    /// When the hold was (last) resolved
    pub resolution_timestamp: Option<DateTime<Utc>>,

    /// When the hold was opened
    pub timestamp: DateTime<Utc>,
}

impl HoldEvent {
    /// Open a new hold event stamped with the current time
    ///
    /// The id is generated here; use [`HoldEvent::with_event_id`] to supply one.
    ///
    /// `sequence` is the recorder's running decision number; it keeps ids of
    /// holds opened in the same instant with the same reasoning distinct.
    pub fn open(
        trigger_reason: String,
        signals: SignalSet,
        weights: Weights,
        context: Option<String>,
        signal_conflicts: Vec<String>,
        uncertainty_metrics: UncertaintyMetrics,
        sequence: u64,
    ) -> Self {
        let timestamp = Utc::now();
        Self {
            event_id: Self::generate_id(&timestamp, &trigger_reason, sequence),
            trigger_reason,
            signals,
            weights,
            context,
            signal_conflicts,
            uncertainty_metrics,
            resolution_action: None,
            resolution_timestamp: None,
            timestamp,
        }
    }

    /// Replace the generated id with a caller-supplied one
    pub fn with_event_id(mut self, event_id: impl Into<String>) -> Self {
        self.event_id = event_id.into();
        self
    }

    /// Short SHA-256 hash over timestamp, trigger reason and sequence number
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::Utc;
    /// use ternary_recorder::HoldEvent;
    ///
    /// let now = Utc::now();
    /// let id = HoldEvent::generate_id(&now, "Missing signals: volume", 0);
    /// assert_eq!(id.len(), 16);
    /// assert_eq!(id, HoldEvent::generate_id(&now, "Missing signals: volume", 0));
    /// assert_ne!(id, HoldEvent::generate_id(&now, "Missing signals: volume", 1));
    /// ```
    pub fn generate_id(timestamp: &DateTime<Utc>, trigger_reason: &str, sequence: u64) -> String {
        let mut hasher = Sha256::new();
        hasher.update(timestamp.to_rfc3339().as_bytes());
        hasher.update(trigger_reason.as_bytes());
        hasher.update(sequence.to_be_bytes());
        let mut id = hex::encode(hasher.finalize());
        id.truncate(EVENT_ID_LEN);
        id
    }

    /// Current lifecycle status
    pub fn status(&self) -> HoldStatus {
        if self.resolution_action.is_some() {
            HoldStatus::Resolved
        } else {
            HoldStatus::Open
        }
    }

    /// Check whether the event is still open
    pub fn is_open(&self) -> bool {
        self.status() == HoldStatus::Open
    }

    /// Record a resolution action
    ///
    /// Resolving an already-resolved event overwrites the action and
    /// timestamp (last write wins).
    pub fn resolve(&mut self, action: impl Into<String>) {
        let action = action.into();
        if let Some(previous) = &self.resolution_action {
            tracing::debug!(
                "Hold {} already resolved ({}); overwriting",
                self.event_id,
                previous
            );
        }
        tracing::info!("Epistemic hold {} resolved: {}", self.event_id, action);
        self.resolution_action = Some(action);
        self.resolution_timestamp = Some(Utc::now());
    }
}
