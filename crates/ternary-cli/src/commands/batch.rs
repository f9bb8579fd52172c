//! Batch command implementation.

use crate::cli::BatchArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use ternary_domain::{SignalSet, Weights};
use ternary_evaluator::{EngineConfig, EvaluationResult, TernaryEvaluator};
use ternary_recorder::DecisionRecorder;

/// One case of a batch file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchCase {
    /// Named readings; `null` marks a missing signal
    #[serde(default)]
    pub signals: SignalSet,

    /// Per-signal weights
    #[serde(default)]
    pub weights: Weights,

    /// Free-form context
    #[serde(default)]
    pub context: String,
}

/// Execute the batch command.
pub fn execute_batch(args: BatchArgs, engine: &EngineConfig, formatter: &Formatter) -> Result<()> {
    let cases = load_cases(&args.file)?;
    let (recorder, results) = run_batch(&cases, engine)?;

    println!("{}", formatter.format_results(&results)?);
    println!();
    println!("{}", formatter.format_statistics(&recorder.summary()?)?);

    let unresolved = recorder.unresolved_holds()?.len();
    if unresolved > 0 {
        eprintln!(
            "{}",
            formatter.warning(&format!("{} case(s) placed on epistemic hold", unresolved))
        );
    }

    if let Some(path) = &args.export {
        recorder.export_to_path(path)?;
        eprintln!(
            "{}",
            formatter.success(&format!("Audit trail written to {}", path.display()))
        );
    }

    Ok(())
}

/// Read a JSON array of cases.
pub fn load_cases(path: &Path) -> Result<Vec<BatchCase>> {
    let contents = fs::read_to_string(path)
        .map_err(|e| CliError::InvalidInput(format!("Failed to read {}: {}", path.display(), e)))?;
    let cases: Vec<BatchCase> = serde_json::from_str(&contents)?;
    tracing::info!("Loaded {} case(s) from {}", cases.len(), path.display());
    Ok(cases)
}

/// Evaluate every case through one recorder.
///
/// Stops at the first case that fails validation.
pub fn run_batch(
    cases: &[BatchCase],
    engine: &EngineConfig,
) -> Result<(DecisionRecorder, Vec<EvaluationResult>)> {
    let recorder = DecisionRecorder::new(TernaryEvaluator::new(engine.clone())?);
    let mut results = Vec::with_capacity(cases.len());

    for (i, case) in cases.iter().enumerate() {
        let result = recorder
            .decide(&case.signals, &case.weights, &case.context)
            .map_err(|e| CliError::InvalidInput(format!("Case {}: {}", i + 1, e)))?;
        results.push(result);
    }

    Ok((recorder, results))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use ternary_domain::{DecisionState, SignalValue};

    const CASES: &str = r#"[
        {
            "signals": {"market_sentiment": 0.8, "technical": 0.6, "volume": 0.7, "fundamentals": 0.9},
            "context": "BTC entry"
        },
        {
            "signals": {"market_sentiment": 0.3, "technical": -0.4, "volume": null, "fundamentals": 0.2},
            "weights": {"market_sentiment": 5.0}
        },
        {
            "signals": {"market_sentiment": -0.8, "technical": -0.6, "volume": -0.5, "fundamentals": -0.7}
        }
    ]"#;

    fn write_cases(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_cases() {
        let file = write_cases(CASES);
        let cases = load_cases(file.path()).unwrap();

        assert_eq!(cases.len(), 3);
        assert_eq!(cases[0].context, "BTC entry");
        assert_eq!(cases[1].signals.get("volume"), Some(SignalValue::Missing));
        assert_eq!(cases[1].weights.weight_for("market_sentiment"), 5.0);
        assert!(cases[2].weights.is_empty());
    }

    #[test]
    fn test_run_batch() {
        let file = write_cases(CASES);
        let cases = load_cases(file.path()).unwrap();
        let (recorder, results) = run_batch(&cases, &EngineConfig::default()).unwrap();

        let states: Vec<_> = results.iter().map(|r| r.state()).collect();
        assert_eq!(
            states,
            vec![DecisionState::Proceed, DecisionState::Hold, DecisionState::Halt]
        );

        let stats = recorder.summary().unwrap();
        assert_eq!(stats.total_decisions, 3);
        assert_eq!(stats.unresolved_holds, 1);
    }

    #[test]
    fn test_invalid_case_names_its_index() {
        let file = write_cases(r#"[{"signals": {"a": 0.5}}, {"signals": {"a": 0.5}, "weights": {"a": -1.0}}]"#);
        let cases = load_cases(file.path()).unwrap();
        let err = run_batch(&cases, &EngineConfig::default()).unwrap_err();
        assert!(err.to_string().contains("Case 2"));
    }

    #[test]
    fn test_malformed_file() {
        let file = write_cases("{not json");
        assert!(matches!(load_cases(file.path()), Err(CliError::Serialization(_))));
    }
}
