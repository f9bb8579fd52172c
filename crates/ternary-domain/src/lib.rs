//! Ternary Domain Layer
//!
//! This crate contains the value types and pure functions shared by every other
//! layer. It performs no I/O and holds no state.
//!
//! ## Key Concepts
//!
//! - **Signal Set**: named readings, each a number or explicitly missing
//! - **Weights**: open-world importance factors (unlisted signals weigh 1.0)
//! - **Decision State**: PROCEED (+1), EPISTEMIC_HOLD (0), HALT (-1)
//! - **Normalization**: per-signal local confidence plus the missing-signal list
//! - **Conflicts**: opposing signals and their dispersion
//!
//! ## Architecture
//!
//! The evaluator and recorder crates build on these types; nothing here knows
//! about thresholds, history or export formats.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod confidence;
pub mod conflict;
pub mod normalizer;
pub mod signal;
pub mod state;

// Re-exports for convenience
pub use confidence::ConfidenceLevel;
pub use conflict::{analyze_conflicts, ConflictAnalysis, SignalConflict};
pub use normalizer::{normalize, Contribution, Normalized, NormalizerConfig};
pub use signal::{Signal, SignalSet, SignalValue, Weights};
pub use state::DecisionState;
