//! Error handling for the crossover alert pipeline
//!
//! Every fallible step returns a `MonitorError`. Conditions that end a run
//! early without anything being wrong (closed market, no crossover, repeated
//! signal) are not errors; they are reported as `RunOutcome` variants.

use std::fmt;

use crate::config::ConfigError;

/// Main error type for the monitor
#[derive(Debug)]
pub enum MonitorError {
    // Configuration errors
    ConfigMissing(String),
    ConfigNotFound(String),
    ConfigParse(String),
    ConfigValidation(String),

    // Data source / notifier API errors
    ApiConnection(String),
    ApiTimeout(String),
    ApiResponse(String),
    DataParse(String),

    // Series shorter than the sample threshold
    InsufficientData { required: usize, available: usize },

    // Persisted signal state
    StateRead(String),
    StateWrite(String),
}

impl MonitorError {
    /// Get a user-friendly error message with helpful context
    pub fn user_message(&self) -> String {
        match self {
            MonitorError::ConfigMissing(name) => {
                format!(
                    "Missing required configuration: {}\n\n\
                    💡 Set it in the environment, e.g.\n\
                    export {}=...",
                    name, name
                )
            }
            MonitorError::ConfigNotFound(path) => {
                format!(
                    "Configuration file not found: {}\n\n\
                    💡 Quick fix:\n\
                    1. Run: ma-cross-alert init\n\
                    2. Edit config.toml\n\
                    3. Try again",
                    path
                )
            }
            MonitorError::InsufficientData { required, available } => {
                format!(
                    "Insufficient data: {} bars fetched, {} required\n\n\
                    💡 The session may have just opened; the next run will retry",
                    available, required
                )
            }
            MonitorError::StateWrite(msg) => {
                format!(
                    "Failed to persist signal state: {}\n\n\
                    💡 Check the state file path and directory permissions",
                    msg
                )
            }
            _ => self.to_string(),
        }
    }

    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            MonitorError::ApiTimeout(_) | MonitorError::ApiConnection(_)
        )
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            MonitorError::ConfigMissing(_)
            | MonitorError::ConfigNotFound(_)
            | MonitorError::ConfigParse(_)
            | MonitorError::ConfigValidation(_) => "config",

            MonitorError::ApiConnection(_)
            | MonitorError::ApiTimeout(_)
            | MonitorError::ApiResponse(_) => "api",

            MonitorError::DataParse(_) | MonitorError::InsufficientData { .. } => "data",

            MonitorError::StateRead(_) | MonitorError::StateWrite(_) => "state",
        }
    }
}

impl fmt::Display for MonitorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitorError::ConfigMissing(name) => {
                write!(f, "Missing required configuration: {}", name)
            }
            MonitorError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path)
            }
            MonitorError::ConfigParse(msg) => {
                write!(f, "Configuration parse error: {}", msg)
            }
            MonitorError::ConfigValidation(msg) => {
                write!(f, "Configuration validation error: {}", msg)
            }

            MonitorError::ApiConnection(msg) => {
                write!(f, "API connection error: {}", msg)
            }
            MonitorError::ApiTimeout(msg) => {
                write!(f, "API timeout: {}", msg)
            }
            MonitorError::ApiResponse(msg) => {
                write!(f, "API response error: {}", msg)
            }
            MonitorError::DataParse(msg) => {
                write!(f, "Data parse error: {}", msg)
            }

            MonitorError::InsufficientData { required, available } => {
                write!(f, "Insufficient data: {} of {} bars", available, required)
            }

            MonitorError::StateRead(msg) => {
                write!(f, "Failed to read signal state: {}", msg)
            }
            MonitorError::StateWrite(msg) => {
                write!(f, "Failed to write signal state: {}", msg)
            }
        }
    }
}

impl std::error::Error for MonitorError {}

// Conversion implementations for common error types

impl From<serde_json::Error> for MonitorError {
    fn from(err: serde_json::Error) -> Self {
        MonitorError::DataParse(format!("JSON parse error: {}", err))
    }
}

impl From<reqwest::Error> for MonitorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            MonitorError::ApiTimeout(err.to_string())
        } else if err.is_decode() {
            MonitorError::DataParse(err.to_string())
        } else if err.is_status() {
            MonitorError::ApiResponse(err.to_string())
        } else {
            MonitorError::ApiConnection(err.to_string())
        }
    }
}

impl From<ConfigError> for MonitorError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::FileNotFound(path) => MonitorError::ConfigNotFound(path),
            ConfigError::Missing(name) => MonitorError::ConfigMissing(name),
            ConfigError::Validation(msg) => MonitorError::ConfigValidation(msg),
            other => MonitorError::ConfigParse(other.to_string()),
        }
    }
}

/// Result type alias using MonitorError
pub type MonitorResult<T> = Result<T, MonitorError>;
