//! Domain error types
//!
//! This module defines the error hierarchy for Cloak. All errors are
//! domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main Cloak error type
///
/// This is the primary error type used throughout the library.
/// Variants map one-to-one onto the failure classes an anonymization
/// run can hit: bad configuration, unknown strategy types, missing
/// seeds, strategy execution failures, and audit integrity findings.
#[derive(Debug, Error)]
pub enum CloakError {
    /// Configuration-related errors (invalid profile, bad parameters)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Registry lookup miss for a strategy type
    #[error("Unknown strategy type '{name}' (available: {available})")]
    UnknownStrategy { name: String, available: String },

    /// A strategy requiring determinism has no seed through any tier
    #[error("No seed available: {0}")]
    SeedUnavailable(String),

    /// A strategy failed while processing a value
    #[error("Strategy '{strategy}' failed for {table}.{column}: {message}")]
    StrategyExecution {
        table: String,
        column: String,
        strategy: String,
        message: String,
    },

    /// Audit verification detected a signature mismatch
    #[error("Audit integrity error: {0}")]
    AuditIntegrity(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl CloakError {
    /// Creates a strategy execution error with no location yet.
    ///
    /// The factory fills in the table and column when it knows them,
    /// via [`CloakError::at`].
    pub fn strategy_execution(strategy: impl Into<String>, message: impl Into<String>) -> Self {
        CloakError::StrategyExecution {
            table: String::new(),
            column: String::new(),
            strategy: strategy.into(),
            message: message.into(),
        }
    }

    /// Attaches table/column context to a strategy execution error.
    ///
    /// Errors that already carry a location, and errors of any other
    /// variant, are returned unchanged.
    pub fn at(self, table: &str, column: &str) -> Self {
        match self {
            CloakError::StrategyExecution {
                table: t,
                column: c,
                strategy,
                message,
            } if t.is_empty() && c.is_empty() => CloakError::StrategyExecution {
                table: table.to_string(),
                column: column.to_string(),
                strategy,
                message,
            },
            other => other,
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for CloakError {
    fn from(err: std::io::Error) -> Self {
        CloakError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for CloakError {
    fn from(err: serde_json::Error) -> Self {
        CloakError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for CloakError {
    fn from(err: toml::de::Error) -> Self {
        CloakError::Configuration(format!("TOML parse error: {err}"))
    }
}
