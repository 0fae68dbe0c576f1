//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading reconciliation
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};

use super::types::{PolicyConfig, ReconcileConfig, TimeWindow, Vocabulary};

/// Loads and validates reconciliation configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── policy.yaml       # Merge window, grace, shift windows, reference year
/// └── vocabulary.yaml   # Punch labels, roster markers, override keywords (optional)
/// ```
///
/// Fields left out of either file keep their built-in defaults.
///
/// # Example
///
/// ```no_run
/// use attendance_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default")?;
/// println!("Merge window: {} minutes", loader.config().policy.merge_window_minutes);
/// # Ok::<(), attendance_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: ReconcileConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if `policy.yaml` is missing, if either file contains
    /// invalid YAML, or if a value fails validation.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let policy_path = path.join("policy.yaml");
        let policy = Self::load_yaml::<PolicyConfig>(&policy_path)?;

        let vocabulary_path = path.join("vocabulary.yaml");
        let vocabulary = if vocabulary_path.exists() {
            Self::load_yaml::<Vocabulary>(&vocabulary_path)?
        } else {
            Vocabulary::default()
        };

        let config = ReconcileConfig { policy, vocabulary };
        Self::validate(&config)?;

        tracing::debug!(path = %path.display(), "Loaded reconciliation configuration");
        Ok(Self { config })
    }

    /// Wraps an in-memory configuration after validating it.
    pub fn from_config(config: ReconcileConfig) -> EngineResult<Self> {
        Self::validate(&config)?;
        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    fn validate(config: &ReconcileConfig) -> EngineResult<()> {
        let policy = &config.policy;

        if policy.merge_window_minutes < 0 {
            return Err(invalid("merge_window_minutes", "must not be negative"));
        }
        if policy.early_leave_grace_minutes < 0 {
            return Err(invalid("early_leave_grace_minutes", "must not be negative"));
        }
        if policy.odd_punch_break_deduction_minutes < 0 {
            return Err(invalid(
                "odd_punch_break_deduction_minutes",
                "must not be negative",
            ));
        }

        check_window("split_shift.first_window", &policy.split_shift.first_window)?;
        check_window("split_shift.second_window", &policy.split_shift.second_window)?;
        check_window("evening_shift.window", &policy.evening_shift.window)?;

        check_base_hours("split_shift.base_hours", policy.split_shift.base_hours)?;
        check_base_hours("evening_shift.base_hours", policy.evening_shift.base_hours)?;
        check_base_hours(
            "explicit_fallback_base_hours",
            policy.explicit_fallback_base_hours,
        )?;

        if config.vocabulary.name_header_labels.is_empty() {
            return Err(invalid(
                "vocabulary.name_header_labels",
                "at least one label is required",
            ));
        }

        Ok(())
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> ReconcileConfig {
        self.config
    }
}

fn invalid(field: &str, message: &str) -> EngineError {
    EngineError::InvalidConfig {
        field: field.to_string(),
        message: message.to_string(),
    }
}

fn check_window(field: &str, window: &TimeWindow) -> EngineResult<()> {
    if window.end <= window.start {
        return Err(invalid(field, "end must be after start"));
    }
    Ok(())
}

fn check_base_hours(field: &str, hours: Decimal) -> EngineResult<()> {
    if hours <= Decimal::ZERO {
        return Err(invalid(field, "must be positive"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn config_path() -> &'static str {
        "./config/default"
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.config().policy.merge_window_minutes, 10);
        assert_eq!(loader.config().policy.early_leave_grace_minutes, 30);
    }

    #[test]
    fn test_shipped_defaults_match_built_in_defaults() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let mut expected = ReconcileConfig::default();
        expected.policy.reference_year = loader.config().policy.reference_year;
        assert_eq!(loader.config(), &expected);
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");
        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("policy.yaml"));
            }
            other => panic!("Expected ConfigNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_merge_window_rejected() {
        let mut config = ReconcileConfig::default();
        config.policy.merge_window_minutes = -1;

        match ConfigLoader::from_config(config) {
            Err(EngineError::InvalidConfig { field, .. }) => {
                assert_eq!(field, "merge_window_minutes");
            }
            other => panic!("Expected InvalidConfig error, got {:?}", other),
        }
    }

    #[test]
    fn test_inverted_window_rejected() {
        let mut config = ReconcileConfig::default();
        config.policy.evening_shift.window = TimeWindow::from_hm((23, 0), (15, 0));

        match ConfigLoader::from_config(config) {
            Err(EngineError::InvalidConfig { field, .. }) => {
                assert_eq!(field, "evening_shift.window");
            }
            other => panic!("Expected InvalidConfig error, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_base_hours_rejected() {
        let mut config = ReconcileConfig::default();
        config.policy.split_shift.base_hours = Decimal::from_str("0").unwrap();

        assert!(ConfigLoader::from_config(config).is_err());
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(ConfigLoader::from_config(ReconcileConfig::default()).is_ok());
    }
}
