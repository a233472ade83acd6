//! Global application error types and handlers.
//!
//! This module defines custom error types that are used across the entire
//! client shell and provides mechanisms for consistent error handling in the
//! session and notification stores.

use serde_json::Value;
use thiserror::Error;

/// Generic service error that can be used across both stores
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Remote authority rejected a login attempt.
    #[error("Authentication failed: {message}")]
    Authentication {
        message: String,
        payload: Option<Value>,
    },

    /// Remote authority rejected a registration attempt.
    #[error("Registration failed: {message}")]
    Registration {
        message: String,
        payload: Option<Value>,
    },

    /// A notification feed read or mutation failed.
    #[error("Feed sync error: {message}")]
    FeedSync { message: String },

    /// A persisted session exists locally but its credential is no longer
    /// accepted by the remote authority.
    #[error("Stale session: {message}")]
    SessionStale { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid operation: {message}")]
    InvalidOperation { message: String },

    /// Durable client-local storage failed.
    #[error("Storage error: {source}")]
    Storage {
        #[from]
        source: anyhow::Error,
    },

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    // Helper constructors for common patterns

    pub fn authentication(message: impl Into<String>, payload: Option<Value>) -> Self {
        Self::Authentication {
            message: message.into(),
            payload,
        }
    }

    pub fn registration(message: impl Into<String>, payload: Option<Value>) -> Self {
        Self::Registration {
            message: message.into(),
            payload,
        }
    }

    pub fn feed_sync(message: impl Into<String>) -> Self {
        Self::FeedSync {
            message: message.into(),
        }
    }

    pub fn session_stale(message: impl Into<String>) -> Self {
        Self::SessionStale {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }

    /// Remote error payload attached to the failure, when the remote
    /// authority returned one.
    pub fn payload(&self) -> Option<&Value> {
        match self {
            Self::Authentication { payload, .. } | Self::Registration { payload, .. } => {
                payload.as_ref()
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_surfaced_verbatim() {
        let remote = json!({"error": "invalid credentials"});
        let err = ServiceError::authentication("invalid credentials", Some(remote.clone()));
        assert_eq!(err.payload(), Some(&remote));
        assert_eq!(err.to_string(), "Authentication failed: invalid credentials");
    }

    #[test]
    fn test_payload_absent_for_feed_errors() {
        let err = ServiceError::feed_sync("connection reset");
        assert!(err.payload().is_none());
    }
}
