//! HTTP translation of domain errors.
//!
//! Operational errors carry their own safe message and map to a 4xx
//! status; everything else is logged in full and reported as a generic
//! 500. Development mode relaxes that and returns the internal detail.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use once_cell::sync::OnceCell;
use tracing::error;

use cl_core::errors::{AuthError, DomainError, TokenError};
use cl_shared::{Envelope, Environment};

static ENVIRONMENT: OnceCell<Environment> = OnceCell::new();

/// Record the running environment for error rendering
///
/// Called once at startup; before that (and in tests) development rules
/// apply.
pub fn set_environment(environment: Environment) {
    let _ = ENVIRONMENT.set(environment);
}

fn environment() -> Environment {
    ENVIRONMENT.get().copied().unwrap_or_default()
}

/// Wrapper carrying a domain error across the actix boundary
#[derive(Debug)]
pub struct ApiError(pub DomainError);

pub type ApiResult<T> = Result<T, ApiError>;

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        Self(error)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match &self.0 {
            DomainError::Validation { .. }
            | DomainError::Duplicate { .. }
            | DomainError::InvalidId { .. } => StatusCode::BAD_REQUEST,

            DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
            DomainError::Conflict { .. } => StatusCode::CONFLICT,
            DomainError::Unauthenticated => StatusCode::UNAUTHORIZED,
            DomainError::Forbidden => StatusCode::FORBIDDEN,
            DomainError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,

            DomainError::Auth(auth) => match auth {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                // A bad reset secret is a bad request, not a failed login.
                AuthError::InvalidOrExpiredToken => StatusCode::BAD_REQUEST,
                AuthError::PasswordMismatch => StatusCode::BAD_REQUEST,
                AuthError::UserNotFound => StatusCode::NOT_FOUND,
            },

            DomainError::Token(token) => match token {
                TokenError::TokenGenerationFailed => StatusCode::INTERNAL_SERVER_ERROR,
                _ => StatusCode::UNAUTHORIZED,
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = if self.0.is_operational() {
            self.0.to_string()
        } else {
            error!(error = %self.0, "Unexpected error while handling request");
            if environment().is_development() {
                self.0.to_string()
            } else {
                "Something went very wrong".to_string()
            }
        };

        HttpResponse::build(self.status_code()).json(Envelope::<()>::failure(message))
    }
}
