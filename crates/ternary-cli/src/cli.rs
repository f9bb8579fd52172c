//! CLI command definitions and argument parsing.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use ternary_domain::SignalValue;

/// Ternary - Classify weighted signals as PROCEED, EPISTEMIC_HOLD or HALT.
#[derive(Debug, Parser)]
#[command(name = "ternary")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path (defaults to ~/.ternary/config.toml when present)
    #[arg(long, global = true, env = "TERNARY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Engine overrides
    #[command(flatten)]
    pub engine: EngineArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Flags that override the engine section of the configuration file.
#[derive(Debug, Default, Clone, clap::Args)]
pub struct EngineArgs {
    /// Start from a named preset instead of the configured engine
    #[arg(long, value_enum, global = true)]
    pub preset: Option<PresetArg>,

    /// Domain tag selecting extra hold hints (e.g. financial, medical, policy)
    #[arg(long, global = true)]
    pub domain: Option<String>,

    /// Minimum confidence to force a decision
    #[arg(long, global = true)]
    pub proceed_threshold: Option<f64>,

    /// Confidence below which the engine halts
    #[arg(long, global = true)]
    pub hold_threshold: Option<f64>,

    /// Reject weights naming signals that are not in the input
    #[arg(long, global = true)]
    pub strict: bool,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (states only)
    Quiet,
}

/// Engine preset options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PresetArg {
    /// 0.85 / 0.40
    Default,
    /// 0.90 / 0.50, strict weights
    Conservative,
    /// 0.70 / 0.30
    Permissive,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Evaluate one set of signals
    Evaluate(EvaluateArgs),

    /// Evaluate a JSON file of cases through a recorder
    Batch(BatchArgs),

    /// Print the effective engine configuration
    Config,
}

/// Arguments for the evaluate command.
#[derive(Debug, Parser)]
pub struct EvaluateArgs {
    /// Signal reading as name=value; use name=null for a missing signal
    #[arg(short, long = "signal", value_parser = parse_signal, required = true)]
    pub signals: Vec<(String, SignalValue)>,

    /// Signal weight as name=weight (unlisted signals weigh 1.0)
    #[arg(short, long = "weight", value_parser = parse_weight)]
    pub weights: Vec<(String, f64)>,

    /// Free-form context recorded with the decision
    #[arg(short, long, default_value = "")]
    pub context: String,
}

/// Arguments for the batch command.
#[derive(Debug, Parser)]
pub struct BatchArgs {
    /// JSON file holding an array of {signals, weights, context} cases
    pub file: PathBuf,

    /// Write the audit trail to this path
    #[arg(long)]
    pub export: Option<PathBuf>,
}

fn split_pair(s: &str) -> Result<(String, &str), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("Expected name=value, got '{}'", s))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("Missing name in '{}'", s));
    }
    Ok((name.to_string(), value.trim()))
}

/// Parse a `name=value` signal argument.
pub fn parse_signal(s: &str) -> Result<(String, SignalValue), String> {
    let (name, value) = split_pair(s)?;
    Ok((name, value.parse()?))
}

/// Parse a `name=weight` argument.
pub fn parse_weight(s: &str) -> Result<(String, f64), String> {
    let (name, value) = split_pair(s)?;
    let weight = value
        .parse::<f64>()
        .map_err(|_| format!("Weight '{}' for '{}' is not numeric", value, name))?;
    Ok((name, weight))
}
