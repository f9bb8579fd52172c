//! Evaluate command implementation.

use crate::cli::EvaluateArgs;
use crate::error::Result;
use crate::output::Formatter;
use ternary_domain::{SignalSet, Weights};
use ternary_evaluator::{EngineConfig, EvaluationResult, TernaryEvaluator};

/// Execute the evaluate command.
pub fn execute_evaluate(args: EvaluateArgs, engine: &EngineConfig, formatter: &Formatter) -> Result<()> {
    let result = evaluate(args, engine)?;
    println!("{}", formatter.format_result(&result)?);
    Ok(())
}

/// Run one evaluation from command-line arguments.
pub fn evaluate(args: EvaluateArgs, engine: &EngineConfig) -> Result<EvaluationResult> {
    let evaluator = TernaryEvaluator::new(engine.clone())?;
    let signals: SignalSet = args.signals.into_iter().collect();
    let weights: Weights = args.weights.into_iter().collect();
    Ok(evaluator.evaluate(&signals, &weights, &args.context)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use ternary_domain::{DecisionState, SignalValue};

    fn args(signals: &[(&str, SignalValue)], weights: &[(&str, f64)]) -> EvaluateArgs {
        EvaluateArgs {
            signals: signals.iter().map(|(n, v)| (n.to_string(), *v)).collect(),
            weights: weights.iter().map(|(n, w)| (n.to_string(), *w)).collect(),
            context: String::new(),
        }
    }

    #[test]
    fn test_evaluate_proceed() {
        let args = args(
            &[("a", SignalValue::Present(0.8)), ("b", SignalValue::Present(0.9))],
            &[],
        );
        let result = evaluate(args, &EngineConfig::default()).unwrap();
        assert_eq!(result.state(), DecisionState::Proceed);
    }

    #[test]
    fn test_strict_rejects_unknown_weight() {
        let engine = EngineConfig {
            strict_weights: true,
            ..Default::default()
        };
        let args = args(&[("a", SignalValue::Present(0.8))], &[("b", 2.0)]);
        let err = evaluate(args, &engine).unwrap_err();
        assert!(matches!(err, CliError::Evaluator(_)));
    }
}
