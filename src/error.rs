//! Error types for MechaMind
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use std::fmt;
use thiserror::Error;

/// Classification of a failed model gateway call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayErrorKind {
    /// The backend could not be reached (connection refused, DNS, 502/503)
    Unreachable,
    /// The backend did not answer within the configured timeout
    Timeout,
    /// The backend does not know the requested model
    ModelNotFound,
    /// The backend answered with something that is not a usable reply
    MalformedResponse,
}

impl fmt::Display for GatewayErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreachable => write!(f, "unreachable"),
            Self::Timeout => write!(f, "timeout"),
            Self::ModelNotFound => write!(f, "model not found"),
            Self::MalformedResponse => write!(f, "malformed response"),
        }
    }
}

/// Main error type for MechaMind operations
///
/// Covers configuration, document ingestion, model gateway calls and
/// orchestrator state violations. Transport, IO and parse failures are
/// classified into one of these at the point they occur.
#[derive(Error, Debug)]
pub enum MechamindError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The uploaded document is unreadable or contains no extractable text
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// The model backend call failed
    #[error("Gateway error ({kind}): {message}")]
    Gateway {
        /// What went wrong at the gateway
        kind: GatewayErrorKind,
        /// Detail reported by the transport or backend
        message: String,
    },

    /// The orchestrator was used while a turn was still being processed
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl MechamindError {
    /// Shorthand for building a gateway error
    pub fn gateway(kind: GatewayErrorKind, message: impl Into<String>) -> Self {
        Self::Gateway {
            kind,
            message: message.into(),
        }
    }

    /// Returns the gateway error kind, if this is a gateway error
    pub fn gateway_kind(&self) -> Option<GatewayErrorKind> {
        match self {
            Self::Gateway { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

/// Result type alias for MechaMind operations
///
/// Uses `anyhow::Error` so context can be attached while the underlying
/// `MechamindError` stays reachable through `downcast_ref`.
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let error = MechamindError::Config("invalid format".to_string());
        assert_eq!(error.to_string(), "Configuration error: invalid format");
    }

    #[test]
    fn test_extraction_error_display() {
        let error = MechamindError::Extraction("no text".to_string());
        assert_eq!(error.to_string(), "Extraction error: no text");
    }

    #[test]
    fn test_gateway_error_display() {
        let error = MechamindError::gateway(GatewayErrorKind::ModelNotFound, "llama9");
        assert_eq!(error.to_string(), "Gateway error (model not found): llama9");
        assert_eq!(error.gateway_kind(), Some(GatewayErrorKind::ModelNotFound));
    }

    #[test]
    fn test_gateway_kind_absent_for_other_errors() {
        let error = MechamindError::InvalidState("busy".to_string());
        assert_eq!(error.gateway_kind(), None);
    }

    #[test]
    fn test_downcast_through_anyhow() {
        let result: Result<()> =
            Err(MechamindError::gateway(GatewayErrorKind::Timeout, "slow").into());
        let err = result.unwrap_err();
        let inner = err.downcast_ref::<MechamindError>().unwrap();
        assert_eq!(inner.gateway_kind(), Some(GatewayErrorKind::Timeout));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MechamindError>();
    }
}
