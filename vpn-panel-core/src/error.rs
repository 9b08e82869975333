//! Error types for the vpn-panel tool
//!
//! This module defines all error types used throughout the application,
//! providing consistent error handling and user-friendly error messages.

use thiserror::Error;

/// Main error type for the vpn-panel application
#[derive(Error, Debug)]
pub enum PanelError {
    /// Errors related to configuration loading/parsing
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Errors reported by the connection backend
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Generic I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing errors
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// JSON serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration file: {path}")]
    LoadFailed { path: String },

    #[error("Failed to save configuration file: {path}")]
    SaveFailed { path: String },

    #[error("Configuration validation error: {message}")]
    ValidationError { message: String },

    #[error("I/O error: {message}")]
    IoError { message: String },
}

/// Backend call failures
///
/// The controller treats every variant the same way: the operation is
/// rolled back to the last stable status and a notice is shown.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("{operation} failed: {reason}")]
    CallFailed { operation: Operation, reason: String },

    #[error("Backend reported success without a server")]
    MissingServer,
}

/// Backend operation names, used in error and log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Connect,
    Disconnect,
    ListServers,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Connect => write!(f, "connect"),
            Operation::Disconnect => write!(f, "disconnect"),
            Operation::ListServers => write!(f, "list servers"),
        }
    }
}

impl BackendError {
    /// Shorthand for a call that reported `success: false`
    pub fn rejected(operation: Operation) -> Self {
        BackendError::CallFailed {
            operation,
            reason: "backend reported failure".to_string(),
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, PanelError>;
