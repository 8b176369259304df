//! Error types for the domain layer.

use std::fmt;
use thiserror::Error;

/// Errors raised while exchanging a token for connection authorization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorizationError {
    /// The presented token was never issued by this registry.
    #[error("Token was not issued by this server")]
    InvalidToken,
}

impl AuthorizationError {
    /// Machine-readable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            AuthorizationError::InvalidToken => ErrorCode::InvalidToken,
        }
    }
}

/// Error codes sent to clients and HTTP callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidMessage,
    InvalidRequest,
    InvalidToken,
    AuthenticationRequired,
    AuthorizationDisabled,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::InvalidMessage => "INVALID_MESSAGE",
            ErrorCode::InvalidRequest => "INVALID_REQUEST",
            ErrorCode::InvalidToken => "INVALID_TOKEN",
            ErrorCode::AuthenticationRequired => "AUTHENTICATION_REQUIRED",
            ErrorCode::AuthorizationDisabled => "AUTHORIZATION_DISABLED",
        };
        write!(f, "{}", s)
    }
}
