//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};
use ternary_domain::DecisionState;
use ternary_evaluator::EvaluationResult;
use ternary_recorder::DecisionStatistics;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format a single evaluation result.
    pub fn format_result(&self, result: &EvaluationResult) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(result.to_json()?),
            OutputFormat::Table => Ok(self.format_result_table(result)),
            OutputFormat::Quiet => Ok(result.state().as_str().to_string()),
        }
    }

    /// Format results of a batch run, one row per case.
    pub fn format_results(&self, results: &[EvaluationResult]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(results)?),
            OutputFormat::Table => Ok(self.format_results_table(results)),
            OutputFormat::Quiet => Ok(results
                .iter()
                .map(|r| r.state().as_str())
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    /// Format decision statistics.
    pub fn format_statistics(&self, stats: &DecisionStatistics) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(stats)?),
            OutputFormat::Table => Ok(stats.report()),
            OutputFormat::Quiet => Ok(format!(
                "{} {} {}",
                stats.proceed_count, stats.hold_count, stats.halt_count
            )),
        }
    }

    fn format_result_table(&self, result: &EvaluationResult) -> String {
        let metadata = result.metadata();
        let confidence = format!(
            "{:.3} ({})",
            result.confidence(),
            result.confidence_level().as_str()
        );
        let signals = format!(
            "{} ({} missing)",
            metadata.signal_count, metadata.missing_count
        );

        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        builder.push_record(["State", self.state_label(result.state()).as_str()]);
        builder.push_record(["Confidence", confidence.as_str()]);
        builder.push_record(["Signals", signals.as_str()]);
        if let Some(dominant) = &metadata.dominant_signal {
            builder.push_record(["Dominant", dominant.as_str()]);
        }
        if let Some(context) = &metadata.context {
            builder.push_record(["Context", context.as_str()]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        let mut lines = vec![table.to_string(), String::new(), result.reasoning().to_string()];
        if !result.next_steps().is_empty() {
            lines.push(String::new());
            lines.push(self.colorize("Next steps:", "cyan"));
            for step in result.next_steps() {
                lines.push(format!("  - {}", step));
            }
        }
        lines.join("\n")
    }

    fn format_results_table(&self, results: &[EvaluationResult]) -> String {
        if results.is_empty() {
            return self.colorize("No cases evaluated.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["#", "State", "Confidence", "Missing", "Context"]);

        for (i, result) in results.iter().enumerate() {
            let metadata = result.metadata();
            builder.push_record([
                (i + 1).to_string(),
                self.state_label(result.state()),
                format!("{:.3}", result.confidence()),
                metadata.missing_count.to_string(),
                metadata.context.clone().unwrap_or_default(),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Decision state, colored by outcome.
    pub fn state_label(&self, state: DecisionState) -> String {
        let color = match state {
            DecisionState::Proceed => "green",
            DecisionState::Hold => "yellow",
            DecisionState::Halt => "red",
        };
        self.colorize(state.as_str(), color)
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}
