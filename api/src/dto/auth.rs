//! Authentication request and response DTOs

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use cl_core::domain::value_objects::auth_session::AuthSession;

use super::validate_mobile;

/// Request body for POST /api/v1/auth/register
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "invalid email address"))]
    pub email: String,

    #[validate(custom(function = "validate_mobile"))]
    pub phone: String,

    #[validate(length(min = 1, max = 50, message = "must be 1 to 50 characters"))]
    pub display_name: String,

    /// Requested role; defaults to client and may not be admin
    pub role: Option<String>,

    #[validate(length(min = 8, max = 128, message = "must be 8 to 128 characters"))]
    pub password: String,

    #[validate(must_match(other = "password", message = "passwords do not match"))]
    pub password_confirm: String,
}

/// Request body for POST /api/v1/auth/login
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "invalid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "must not be empty"))]
    pub password: String,
}

/// Request body for POST /api/v1/auth/forgot_password
#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "invalid email address"))]
    pub email: String,
}

/// Request body for PUT /api/v1/auth/reset_password/{token}
#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 8, max = 128, message = "must be 8 to 128 characters"))]
    pub password: String,

    #[validate(must_match(other = "password", message = "passwords do not match"))]
    pub password_confirm: String,
}

/// Request body for PATCH /api/v1/auth/update_password
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePasswordRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub current_password: String,

    #[validate(length(min = 8, max = 128, message = "must be 8 to 128 characters"))]
    pub password: String,

    #[validate(must_match(other = "password", message = "passwords do not match"))]
    pub password_confirm: String,
}

/// Session payload returned by every endpoint that logs the caller in
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionPayload {
    /// Signed bearer token
    pub token: String,

    /// Public view of the authenticated user
    pub user: Value,
}

impl From<&AuthSession> for SessionPayload {
    fn from(session: &AuthSession) -> Self {
        Self {
            token: session.token.clone(),
            user: session.public_user(),
        }
    }
}

/// Payload for a successful reset request in development mode
#[derive(Debug, Serialize, Deserialize)]
pub struct ResetIssuedPayload {
    /// Raw reset secret, exposed in-band only in development
    pub reset_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_request() -> RegisterRequest {
        RegisterRequest {
            email: "a@example.com".to_string(),
            phone: "+61412345678".to_string(),
            display_name: "A".to_string(),
            role: None,
            password: "s3cret-pass".to_string(),
            password_confirm: "s3cret-pass".to_string(),
        }
    }

    #[test]
    fn test_register_request_accepts_valid_input() {
        assert!(register_request().validate().is_ok());
    }

    #[test]
    fn test_register_request_rejects_short_password() {
        let mut request = register_request();
        request.password = "short".to_string();
        request.password_confirm = "short".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_register_request_rejects_mismatched_confirmation() {
        let mut request = register_request();
        request.password_confirm = "different-pass".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_register_request_rejects_bad_email() {
        let mut request = register_request();
        request.email = "nope".to_string();
        assert!(request.validate().is_err());
    }
}
