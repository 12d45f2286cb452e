// src/error.rs

//! Unified error handling for the afiliado client.

use std::fmt;

use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed (transport/connectivity)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Response payload did not match the expected shape
    #[error("Malformed response from {context}: {message}")]
    Parse { context: String, message: String },

    /// Required field missing or malformed, detected before any network call
    #[error("Validation error: {0}")]
    Validation(String),

    /// A device capability was refused by the user
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Server answered with a non-success status
    #[error("Server rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Session token missing or unusable; fatal for the invoking command
    #[error("Session error: {0}")]
    Session(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Create a malformed-response error with context.
    pub fn parse(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Parse {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a permission-denied error.
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::PermissionDenied(message.into())
    }

    /// Create a server-rejection error.
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    /// Create a session error.
    pub fn session(message: impl Into<String>) -> Self {
        Self::Session(message.into())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether this error blocks the invoking command entirely.
    ///
    /// Only the missing-session case is fatal; everything else is surfaced
    /// and the command keeps whatever state it already had.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Session(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_session_errors_are_fatal() {
        assert!(AppError::session("no token").is_fatal());
        assert!(!AppError::validation("missing title").is_fatal());
        assert!(!AppError::rejected(500, "boom").is_fatal());
        assert!(!AppError::permission_denied("camera").is_fatal());
    }

    #[test]
    fn test_rejected_display_includes_status() {
        let e = AppError::rejected(422, "Campos incompletos");
        assert_eq!(
            e.to_string(),
            "Server rejected request (422): Campos incompletos"
        );
    }
}
