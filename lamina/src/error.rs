//! Error types for the lamina library.
//!
//! This module provides the error hierarchy for the configuration and
//! extension-discovery pipeline, using `thiserror` for ergonomic error
//! handling.

use thiserror::Error;

use crate::lifecycle::LifecyclePhase;

/// Result type alias for operations that may fail with a lamina error.
///
/// # Examples
///
/// ```
/// use lamina::{Error, Result};
///
/// fn example_operation() -> Result<u32> {
///     Ok(42)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the lamina library.
///
/// Every fatal condition in the pipeline surfaces as one of these
/// variants; recoverable conditions (missing resources, empty parses)
/// are logged and skipped rather than raised.
#[derive(Debug, Error)]
pub enum Error {
    /// A configuration resource could not be resolved or parsed.
    ///
    /// This is fatal: any I/O or parse failure while loading a search
    /// location aborts the whole pipeline.
    #[error("failed to load property source from location '{location}'")]
    PropertySourceLoad {
        /// The location string that failed to load.
        location: String,
        /// The underlying failure.
        #[source]
        source: Box<Error>,
    },

    /// A mandatory registry capability produced no candidates.
    #[error("no registered candidates for capability '{capability}'")]
    NoCandidates {
        /// The capability key that came up empty.
        capability: String,
    },

    /// One or more excluded identifiers are not part of the candidate set.
    #[error("the following identifiers could not be excluded because they are not contributor candidates: {}", identifiers.join(", "))]
    InvalidExclusions {
        /// The invalid identifiers, in the order they were declared.
        identifiers: Vec<String>,
    },

    /// A lifecycle listener failed during a broadcast phase.
    #[error("listener error during {phase} phase: {message}")]
    Listener {
        /// The phase that was being broadcast.
        phase: LifecyclePhase,
        /// A description of the listener failure.
        message: String,
    },

    /// A YAML document could not be parsed.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A validation error occurred.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field or input that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },
}

impl Error {
    /// Check if the error is a fatal property-source load failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use lamina::Error;
    ///
    /// let err = Error::PropertySourceLoad {
    ///     location: "file:./application.yaml".to_string(),
    ///     source: Box::new(Error::Validation {
    ///         field: "application.yaml".to_string(),
    ///         message: "bad syntax".to_string(),
    ///     }),
    /// };
    /// assert!(err.is_load_failure());
    /// ```
    #[must_use]
    pub fn is_load_failure(&self) -> bool {
        matches!(self, Self::PropertySourceLoad { .. })
    }

    /// Check if the error reports invalid exclusions.
    #[must_use]
    pub fn is_invalid_exclusions(&self) -> bool {
        matches!(self, Self::InvalidExclusions { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_source_load_error() {
        let err = Error::PropertySourceLoad {
            location: "classpath:/application.yaml".to_string(),
            source: Box::new(Error::Validation {
                field: "application.yaml".to_string(),
                message: "mapping values are not allowed".to_string(),
            }),
        };
        let display = format!("{err}");
        assert!(display.contains("failed to load property source"));
        assert!(display.contains("classpath:/application.yaml"));
    }

    #[test]
    fn test_no_candidates_error() {
        let err = Error::NoCandidates {
            capability: "lamina.contributors".to_string(),
        };
        let display = format!("{err}");
        assert!(display.contains("no registered candidates"));
        assert!(display.contains("lamina.contributors"));
    }

    #[test]
    fn test_invalid_exclusions_error_lists_identifiers() {
        let err = Error::InvalidExclusions {
            identifiers: vec!["alpha".to_string(), "beta".to_string()],
        };
        let display = format!("{err}");
        assert!(display.contains("alpha, beta"));
        assert!(err.is_invalid_exclusions());
    }

    #[test]
    fn test_listener_error() {
        let err = Error::Listener {
            phase: LifecyclePhase::Starting,
            message: "listener refused to start".to_string(),
        };
        let display = format!("{err}");
        assert!(display.contains("starting"));
        assert!(display.contains("listener refused to start"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        let display = format!("{err}");
        assert!(display.contains("I/O error"));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<u32> {
            Err(Error::Validation {
                field: "test".to_string(),
                message: "test".to_string(),
            })
        }

        assert!(returns_result().is_err());
    }
}
