//! Error types for the Attendance Reconciliation Engine.
//!
//! Only structural problems surface as errors. Odd-looking rows, unparseable
//! timestamps and unknown override commands are absorbed as data by the
//! ingest stages and never reach this type.

use thiserror::Error;

/// The main error type for the Attendance Reconciliation Engine.
///
/// # Example
///
/// ```
/// use attendance_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/policy.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/policy.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// The roster grid has no row carrying the employee-name header.
    ///
    /// Nothing downstream can be computed without it, so the caller must not
    /// proceed to reconciliation.
    #[error("Roster header row not found after scanning {rows_scanned} rows (expected one of: {labels})")]
    RosterHeaderNotFound {
        /// How many grid rows were scanned.
        rows_scanned: usize,
        /// The header labels that were searched for, comma separated.
        labels: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A configuration value parsed but is not usable.
    #[error("Invalid configuration value '{field}': {message}")]
    InvalidConfig {
        /// The offending field.
        field: String,
        /// Why the value was rejected.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_header_not_found_displays_labels() {
        let error = EngineError::RosterHeaderNotFound {
            rows_scanned: 12,
            labels: "姓名, Name".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Roster header row not found after scanning 12 rows (expected one of: 姓名, Name)"
        );
    }

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/policy.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/policy.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_invalid_config_displays_field_and_message() {
        let error = EngineError::InvalidConfig {
            field: "merge_window_minutes".to_string(),
            message: "must not be negative".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid configuration value 'merge_window_minutes': must not be negative"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_header_missing() -> EngineResult<()> {
            Err(EngineError::RosterHeaderNotFound {
                rows_scanned: 0,
                labels: String::new(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_header_missing()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
