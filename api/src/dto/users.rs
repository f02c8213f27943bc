//! User management request DTOs

use serde::Deserialize;
use serde_json::{Map, Value};
use validator::Validate;

use super::validate_mobile;

/// Request body for PATCH /api/v1/users/update_me
///
/// Only profile fields are accepted here; password changes go through
/// the dedicated endpoint.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMeRequest {
    #[validate(email(message = "invalid email address"))]
    pub email: Option<String>,

    #[validate(custom(function = "validate_mobile"))]
    pub phone: Option<String>,

    #[validate(length(min = 1, max = 50, message = "must be 1 to 50 characters"))]
    pub display_name: Option<String>,
}

impl UpdateMeRequest {
    /// Convert into the field map the repository merges
    ///
    /// Absent fields are left untouched; the email is case-folded the
    /// same way registration folds it.
    pub fn into_fields(self) -> Map<String, Value> {
        let mut fields = Map::new();
        if let Some(email) = self.email {
            fields.insert(
                "email".to_string(),
                Value::String(cl_shared::validation::normalize_email(&email)),
            );
        }
        if let Some(phone) = self.phone {
            fields.insert("phone".to_string(), Value::String(phone));
        }
        if let Some(display_name) = self.display_name {
            fields.insert("display_name".to_string(), Value::String(display_name));
        }
        fields
    }
}

/// Request body for the admin POST /api/v1/users
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email(message = "invalid email address"))]
    pub email: String,

    #[validate(custom(function = "validate_mobile"))]
    pub phone: String,

    #[validate(length(min = 1, max = 50, message = "must be 1 to 50 characters"))]
    pub display_name: String,

    /// Admins may assign any role, including admin
    pub role: Option<String>,

    #[validate(length(min = 8, max = 128, message = "must be 8 to 128 characters"))]
    pub password: String,
}

/// Request body for the admin PATCH /api/v1/users/{id}
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(email(message = "invalid email address"))]
    pub email: Option<String>,

    #[validate(custom(function = "validate_mobile"))]
    pub phone: Option<String>,

    #[validate(length(min = 1, max = 50, message = "must be 1 to 50 characters"))]
    pub display_name: Option<String>,

    pub role: Option<String>,
}

impl UpdateUserRequest {
    /// Convert into the field map the repository merges
    pub fn into_fields(self) -> Map<String, Value> {
        let mut fields = Map::new();
        if let Some(email) = self.email {
            fields.insert(
                "email".to_string(),
                Value::String(cl_shared::validation::normalize_email(&email)),
            );
        }
        if let Some(phone) = self.phone {
            fields.insert("phone".to_string(), Value::String(phone));
        }
        if let Some(display_name) = self.display_name {
            fields.insert("display_name".to_string(), Value::String(display_name));
        }
        if let Some(role) = self.role {
            fields.insert("role".to_string(), Value::String(role.to_lowercase()));
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_me_skips_absent_fields() {
        let request = UpdateMeRequest {
            email: None,
            phone: None,
            display_name: Some("New Name".to_string()),
        };
        let fields = request.into_fields();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["display_name"], "New Name");
    }

    #[test]
    fn test_update_me_case_folds_email() {
        let request = UpdateMeRequest {
            email: Some("Mixed@Example.COM".to_string()),
            phone: None,
            display_name: None,
        };
        let fields = request.into_fields();
        assert_eq!(fields["email"], "mixed@example.com");
    }

    #[test]
    fn test_update_me_validates_optional_email() {
        let request = UpdateMeRequest {
            email: Some("nope".to_string()),
            phone: None,
            display_name: None,
        };
        assert!(request.validate().is_err());
    }
}
