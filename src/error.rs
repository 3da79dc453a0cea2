//! Error types for the honeypot.

use std::time::Duration;

/// Top-level error type for the service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Callback error: {0}")]
    Callback(#[from] CallbackError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Session lifecycle errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session not found: {id}")]
    NotFound { id: String },

    #[error("Session {id} already terminated")]
    AlreadyTerminated { id: String },
}

/// Callback delivery errors. Delivery is at-most-once: these are logged,
/// never retried, and never surfaced to the triggering caller.
#[derive(Debug, thiserror::Error)]
pub enum CallbackError {
    #[error("Callback request failed: {0}")]
    Http(String),

    #[error("Callback timed out after {0:?}")]
    Timeout(Duration),

    #[error("Callback endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },
}

/// Result type alias for the service.
pub type Result<T> = std::result::Result<T, Error>;
