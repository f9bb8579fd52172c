//! Ternary Recorder
//!
//! Bookkeeping around the ternary evaluator: every decision is appended to a
//! history, and every EPISTEMIC_HOLD opens an auditable hold event.
//!
//! # Overview
//!
//! The Recorder is responsible for:
//! - **Decision history**: Append-only log of results with the inputs that produced them
//! - **Hold events**: `OPEN` until a resolution action is attached, then `RESOLVED`
//! - **Statistics**: Per-state counts and rates, average confidence, hold rate against target
//! - **Audit export**: One JSON document with config, statistics, history and hold events
//!
//! History and hold events live behind a single mutex, so one recorder can
//! serve several threads.
//!
//! # Usage
//!
//! ```
//! use ternary_domain::{SignalSet, Weights};
//! use ternary_recorder::DecisionRecorder;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let recorder = DecisionRecorder::default_config();
//! let signals = SignalSet::new().with("market_sentiment", 0.8).with("technical", 0.6);
//! recorder.decide(&signals, &Weights::new(), "")?;
//!
//! println!("{}", recorder.summary()?.report());
//!
//! let mut trail = Vec::new();
//! recorder.export(&mut trail)?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod export;
mod hold_event;
mod recorder;
mod statistics;

pub use error::RecorderError;
pub use hold_event::{HoldEvent, HoldStatus, UncertaintyMetrics, EVENT_ID_LEN};
pub use recorder::{DecisionRecord, DecisionRecorder};
pub use statistics::DecisionStatistics;
