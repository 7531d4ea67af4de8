//! Error types for the MCET calendar core.

use thiserror::Error;

/// Errors that can occur in calendar, attendance and event operations.
#[derive(Error, Debug)]
pub enum McetError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Malformed key '{0}'")]
    MalformedKey(String),

    #[error("Malformed record at '{path}': {reason}")]
    MalformedRecord { path: String, reason: String },

    #[error("Store unavailable: {0}")]
    NetworkUnavailable(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Calendar view is not ready ({0})")]
    NotReady(String),

    #[error("Identity key '{key}' is shared by '{existing}' and '{other}'")]
    IdentityCollision {
        key: String,
        existing: String,
        other: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl McetError {
    /// Stable label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            McetError::InvalidArgument(_) => "invalid_argument",
            McetError::MalformedKey(_) => "malformed_key",
            McetError::MalformedRecord { .. } => "malformed_record",
            McetError::NetworkUnavailable(_) => "network_unavailable",
            McetError::Unauthorized(_) => "unauthorized",
            McetError::NotReady(_) => "not_ready",
            McetError::IdentityCollision { .. } => "identity_collision",
            McetError::Config(_) => "config",
            McetError::Io(_) => "io",
            McetError::Serialization(_) => "serialization",
        }
    }
}

impl From<serde_json::Error> for McetError {
    fn from(e: serde_json::Error) -> Self {
        McetError::Serialization(e.to_string())
    }
}

/// Result type alias for MCET operations.
pub type McetResult<T> = Result<T, McetError>;
