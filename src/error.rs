//! # Error Types
//!
//! Error taxonomy shared by adapters, the pipeline and the server start-up path.
//!
//! Adapters work internally with [`AdapterError`] and `?`, then normalize into
//! [`ExternalOperationResult`](crate::adapters::ExternalOperationResult) at their
//! boundary. Only data crosses into the pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::config::ConfigurationError;

/// Category of a failed external operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Network failure, timeout, or an unreadable response stream
    Transport,
    /// The remote service answered with a well-formed rejection
    Rejected,
    /// The response body was missing expected fields or could not be parsed
    Malformed,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Transport => "transport",
            ErrorKind::Rejected => "rejected",
            ErrorKind::Malformed => "malformed",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while talking to a remote service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdapterError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("{0}")]
    Rejected(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl AdapterError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AdapterError::Transport(_) => ErrorKind::Transport,
            AdapterError::Rejected(_) => ErrorKind::Rejected,
            AdapterError::MalformedResponse(_) => ErrorKind::Malformed,
        }
    }

    /// Only transport failures are worth another attempt
    pub fn is_retryable(&self) -> bool {
        matches!(self, AdapterError::Transport(_))
    }
}

/// Top-level error for bootstrap and server start-up
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adapter_error_kinds() {
        assert_eq!(AdapterError::transport("down").kind(), ErrorKind::Transport);
        assert_eq!(AdapterError::rejected("no").kind(), ErrorKind::Rejected);
        assert_eq!(AdapterError::malformed("{}").kind(), ErrorKind::Malformed);
    }

    #[test]
    fn test_only_transport_is_retryable() {
        assert!(AdapterError::transport("timeout").is_retryable());
        assert!(!AdapterError::rejected("card declined").is_retryable());
        assert!(!AdapterError::malformed("missing id").is_retryable());
    }

    #[test]
    fn test_rejected_display_is_the_remote_reason() {
        let err = AdapterError::rejected("channel_not_found");
        assert_eq!(err.to_string(), "channel_not_found");
    }

    #[test]
    fn test_error_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorKind::Malformed).unwrap();
        assert_eq!(json, "\"malformed\"");
    }
}
