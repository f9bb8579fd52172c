//! Configuration management for the CLI.

use crate::cli::{EngineArgs, PresetArg};
use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use ternary_evaluator::EngineConfig;

/// CLI configuration.
///
/// ```toml
/// [settings]
/// color = true
/// format = "table"
///
/// [engine]
/// proceed_threshold = 0.85
/// hold_threshold = 0.40
/// domain = "financial"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Output settings
    #[serde(default)]
    pub settings: Settings,

    /// Engine configuration
    #[serde(default)]
    pub engine: EngineConfig,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl From<crate::cli::CliFormat> for OutputFormat {
    fn from(format: crate::cli::CliFormat) -> Self {
        match format {
            crate::cli::CliFormat::Table => OutputFormat::Table,
            crate::cli::CliFormat::Json => OutputFormat::Json,
            crate::cli::CliFormat::Quiet => OutputFormat::Quiet,
        }
    }
}

impl CliConfig {
    /// Get the default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".ternary").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the default path is used
    /// when present and built-in defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let path = Self::default_path()?;
                if path.exists() {
                    Self::from_file(&path)
                } else {
                    tracing::debug!("No config at {}, using defaults", path.display());
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: CliConfig = toml::from_str(&contents)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Effective engine configuration after applying command-line overrides.
    pub fn engine_config(&self, overrides: &EngineArgs) -> Result<EngineConfig> {
        let mut engine = match overrides.preset {
            Some(PresetArg::Default) => EngineConfig::default(),
            Some(PresetArg::Conservative) => EngineConfig::conservative(),
            Some(PresetArg::Permissive) => EngineConfig::permissive(),
            None => self.engine.clone(),
        };

        if let Some(domain) = &overrides.domain {
            engine.domain = Some(domain.clone());
        }
        if let Some(proceed) = overrides.proceed_threshold {
            engine.proceed_threshold = proceed;
        }
        if let Some(hold) = overrides.hold_threshold {
            engine.hold_threshold = hold;
        }
        if overrides.strict {
            engine.strict_weights = true;
        }

        engine.validate()?;
        Ok(engine)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: default_true(),
            format: default_format(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert!(config.settings.color);
        assert_eq!(config.settings.format, OutputFormat::Table);
        assert_eq!(config.engine, EngineConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[settings]\nformat = \"json\"\n\n[engine]\nproceed_threshold = 0.9\ndomain = \"medical\""
        )
        .unwrap();

        let config = CliConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.settings.format, OutputFormat::Json);
        assert!(config.settings.color);
        assert_eq!(config.engine.proceed_threshold, 0.9);
        assert_eq!(config.engine.hold_threshold, 0.40);
        assert_eq!(config.engine.domain.as_deref(), Some("medical"));
    }

    #[test]
    fn test_explicit_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = CliConfig::load(Some(dir.path().join("absent.toml").as_path())).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_overrides() {
        let overrides = EngineArgs {
            domain: Some("policy".to_string()),
            proceed_threshold: Some(0.8),
            hold_threshold: Some(0.3),
            strict: true,
            ..Default::default()
        };
        let engine = CliConfig::default().engine_config(&overrides).unwrap();

        assert_eq!(engine.domain.as_deref(), Some("policy"));
        assert_eq!(engine.proceed_threshold, 0.8);
        assert_eq!(engine.hold_threshold, 0.3);
        assert!(engine.strict_weights);
    }

    #[test]
    fn test_preset_override() {
        let overrides = EngineArgs {
            preset: Some(PresetArg::Permissive),
            ..Default::default()
        };
        let engine = CliConfig::default().engine_config(&overrides).unwrap();
        assert_eq!(engine, EngineConfig::permissive());
    }

    #[test]
    fn test_invalid_override_rejected() {
        let overrides = EngineArgs {
            hold_threshold: Some(0.95),
            ..Default::default()
        };
        let err = CliConfig::default().engine_config(&overrides).unwrap_err();
        assert!(matches!(err, CliError::Evaluator(_)));
    }
}
