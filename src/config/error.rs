//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid request timeout: must be between 1 and 300 seconds")]
    InvalidTimeout,

    #[error("Default gateway '{0}' is not a configured gateway")]
    UnknownDefaultGateway(String),

    #[error("Invalid {0} secret key format")]
    InvalidSecretKey(&'static str),

    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),
}
