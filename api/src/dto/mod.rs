//! Request and response data transfer objects

pub mod auth;
pub mod users;

use validator::{ValidationError, ValidationErrors};

use cl_core::errors::DomainError;

use crate::handlers::ApiError;

/// Flatten validator output into one operational error
///
/// The message lists each failing field once, in a stable order.
pub fn validation_error(errors: ValidationErrors) -> ApiError {
    let mut parts: Vec<String> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errors)| {
            let detail = errors
                .first()
                .and_then(|e| e.message.as_ref())
                .map(|m| m.to_string())
                .unwrap_or_else(|| "invalid value".to_string());
            format!("{}: {}", field, detail)
        })
        .collect();
    parts.sort();

    ApiError(DomainError::validation(parts.join("; ")))
}

/// Validator hook for mobile numbers
pub fn validate_mobile(phone: &str) -> Result<(), ValidationError> {
    if cl_shared::validation::is_valid_mobile(phone) {
        Ok(())
    } else {
        let mut error = ValidationError::new("mobile");
        error.message = Some("invalid mobile number".into());
        Err(error)
    }
}
