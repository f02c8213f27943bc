//! Domain-specific error types and error handling.
//!
//! Two kinds of failure flow through the system: operational errors
//! (expected, user-facing, carrying a safe message) and unexpected errors
//! (store faults, bugs). The presentation layer returns operational errors
//! verbatim and hides `Internal` detail outside development.

use thiserror::Error;

/// Authentication-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Uniform failure for both unknown email and wrong password, so the
    /// response never reveals which credential was bad.
    #[error("Incorrect email or password")]
    InvalidCredentials,

    #[error("Reset token is invalid or has expired")]
    InvalidOrExpiredToken,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("User not found")]
    UserNotFound,
}

/// Token-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token format")]
    InvalidTokenFormat,

    #[error("Token signature verification failed")]
    InvalidSignature,

    #[error("Token generation failed")]
    TokenGenerationFailed,
}

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Duplicate value for field: {field}")]
    Duplicate { field: String },

    #[error("Invalid identifier: {value}")]
    InvalidId { value: String },

    #[error("{resource} not found")]
    NotFound { resource: String },

    #[error("Conflict while updating {resource}, please retry")]
    Conflict { resource: String },

    #[error("You are not logged in")]
    Unauthenticated,

    #[error("You do not have permission to perform this action")]
    Forbidden,

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl DomainError {
    /// Build a validation error for a specific field
    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation {
            message: message.into(),
        }
    }

    /// Build a not-found error naming the missing resource
    pub fn not_found(resource: impl Into<String>) -> Self {
        DomainError::NotFound {
            resource: resource.into(),
        }
    }

    /// Operational errors are expected and safe to show the caller;
    /// everything else is logged and reported generically.
    pub fn is_operational(&self) -> bool {
        !matches!(self, DomainError::Internal { .. })
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_errors_share_one_message() {
        // Unknown email and wrong password must be indistinguishable.
        let a = AuthError::InvalidCredentials.to_string();
        let b = AuthError::InvalidCredentials.to_string();
        assert_eq!(a, b);
        assert!(!a.to_lowercase().contains("user"));
    }

    #[test]
    fn test_internal_is_not_operational() {
        let err = DomainError::Internal {
            message: "boom".to_string(),
        };
        assert!(!err.is_operational());
        assert!(DomainError::not_found("User").is_operational());
    }
}
