//! Configuration error types
//!
//! Construction-time problems only. Runtime failures belong to the bridge's
//! own error taxonomy; a bridge instance with an invalid configuration is
//! never built in the first place.

use thiserror::Error;

/// Result type alias for configuration handling
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised while assembling a bridge configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required configuration variable is absent
    #[error("Missing configuration variable: {0}")]
    MissingVar(String),

    /// The integration pattern is not one of the supported variants
    #[error("Invalid integration pattern: {0}")]
    InvalidPattern(String),

    /// The static parameter payload is not valid JSON
    #[error("Invalid static parameters: {0}")]
    InvalidParameters(String),

    /// The invoke timeout could not be parsed
    #[error("Invalid invoke timeout: {0}")]
    InvalidTimeout(String),

    /// A configuration field failed validation
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
