//! Ternary Evaluator
//!
//! Maps a set of weighted signals onto one of three outcomes: PROCEED,
//! EPISTEMIC_HOLD or HALT.
//!
//! The Evaluator provides:
//! - Input validation (finite readings, non-negative weights, optional strict weight names)
//! - Weighted aggregation of value and confidence, with missing signals dragging confidence down
//! - Two-threshold decision policy where confidence gates whether a decision is forced
//! - Reasoning text and, for holds, concrete next steps (including per-domain hints)
//!
//! # Examples
//!
//! ```
//! use ternary_domain::{DecisionState, SignalSet};
//! use ternary_evaluator::{EngineConfig, TernaryEvaluator, Weights};
//!
//! let evaluator = TernaryEvaluator::new(EngineConfig::default()).unwrap();
//! let signals = SignalSet::new()
//!     .with("market_sentiment", 0.8)
//!     .with("technical", 0.6)
//!     .with("volume", 0.7)
//!     .with("fundamentals", 0.9);
//!
//! let result = evaluator.evaluate(&signals, &Weights::new(), "BTC entry").unwrap();
//! assert_eq!(result.state(), DecisionState::Proceed);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
mod error;
mod evaluator;
pub mod hints;
mod result;

pub use config::EngineConfig;
pub use error::EvaluatorError;
pub use evaluator::TernaryEvaluator;
pub use result::{EvaluationMetadata, EvaluationResult};
pub use ternary_domain::{SignalSet, SignalValue, Weights};
