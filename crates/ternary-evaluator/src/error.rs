//! Evaluator error types

use thiserror::Error;

/// Errors that can occur while configuring or running the evaluator
///
/// Missing signals, an empty signal set and zero total weight are not
/// errors: they produce an EPISTEMIC_HOLD result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluatorError {
    /// Thresholds or other settings out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A present signal reading is NaN or infinite
    #[error("Invalid value for signal '{name}': {value}")]
    InvalidSignalValue {
        /// Signal name
        name: String,
        /// Offending reading
        value: f64,
    },

    /// A weight is negative, NaN or infinite
    #[error("Invalid weight for signal '{name}': {weight}")]
    InvalidWeight {
        /// Signal name
        name: String,
        /// Offending weight
        weight: f64,
    },

    /// Strict mode: a weight names no signal in the set
    #[error("Weight given for unknown signal '{0}'")]
    UnknownWeight(String),

    /// An evaluation result violates its construction invariants
    #[error("Invalid result: {0}")]
    InvalidResult(String),
}
