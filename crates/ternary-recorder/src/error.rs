//! Error types for Recorder operations

use thiserror::Error;
use ternary_evaluator::EvaluatorError;

/// Errors that can occur during Recorder operations
#[derive(Error, Debug)]
pub enum RecorderError {
    /// Evaluation failed before anything was recorded
    #[error("Evaluation error: {0}")]
    Evaluation(#[from] EvaluatorError),

    /// No hold event with the given id
    #[error("Hold event not found: {0}")]
    NotFound(String),

    /// Writing the audit trail failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing the audit trail failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A thread panicked while holding the recorder lock
    #[error("Recorder state poisoned by a panicked thread")]
    Poisoned,
}
