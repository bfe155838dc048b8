//! Error types for the Cuaderno application.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geolocation::GeolocationError;

/// A shared error type for the entire Cuaderno application.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum CuadernoError {
    /// Invalid user input (missing required sub-log fields, out-of-range
    /// index, busy affordance). The message is user-facing.
    #[error("{0}")]
    Validation(String),

    /// Serialization/deserialization error
    #[error("Parse error: {format} - {message}")]
    Parse {
        format: String, // "JSON", "TOML", etc.
        message: String,
    },

    /// No authenticated session; submission and the entry list are blocked.
    #[error("Usuario no autenticado.")]
    Unauthenticated,

    /// Document store error (write or subscription failure)
    #[error("Store error: {0}")]
    Store(String),

    /// Geolocation acquisition failure
    #[error("Error de geolocalización. {0}")]
    Geolocation(#[from] GeolocationError),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CuadernoError {
    /// Creates a Validation error with a user-facing message
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a Store error
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is a Validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a Parse error
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }

    /// Check if this is an Unauthenticated error
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Unauthenticated)
    }

    /// Check if this is a Store error
    pub fn is_store(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}

impl From<std::io::Error> for CuadernoError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for CuadernoError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error at infrastructure edges
impl From<anyhow::Error> for CuadernoError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, CuadernoError>`.
pub type Result<T> = std::result::Result<T, CuadernoError>;
