//! Config command implementation.

use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::Formatter;
use ternary_evaluator::EngineConfig;

/// Execute the config command.
pub fn execute_config(engine: &EngineConfig, formatter: &Formatter) -> Result<()> {
    println!("{}", render(engine, formatter.format())?);
    Ok(())
}

/// Render the engine configuration in the requested format.
pub fn render(engine: &EngineConfig, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(engine)?),
        OutputFormat::Table | OutputFormat::Quiet => Ok(engine.to_toml()?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_toml_roundtrips() {
        let engine = EngineConfig::conservative().with_domain("medical");
        let rendered = render(&engine, OutputFormat::Table).unwrap();
        assert!(rendered.contains("proceed_threshold = 0.9"));
        assert_eq!(EngineConfig::from_toml(&rendered).unwrap(), engine);
    }

    #[test]
    fn test_render_json() {
        let rendered = render(&EngineConfig::default(), OutputFormat::Json).unwrap();
        let json: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(json["hold_threshold"], 0.4);
    }
}
