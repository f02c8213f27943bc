//! Authentication outcome handed back to the presentation layer.

use serde_json::Value;

use crate::domain::entities::user::User;
use crate::repositories::Document;

/// A freshly signed bearer token together with the authenticated user
#[derive(Debug, Clone)]
pub struct AuthSession {
    /// Signed bearer token
    pub token: String,

    /// The authenticated user record
    pub user: User,
}

impl AuthSession {
    /// Create a new session value
    pub fn new(token: String, user: User) -> Self {
        Self { token, user }
    }

    /// The user record shaped for a response: hidden fields stripped
    pub fn public_user(&self) -> Value {
        let mut value = serde_json::to_value(&self.user).unwrap_or(Value::Null);
        if let Value::Object(ref mut map) = value {
            for field in User::hidden_fields() {
                map.remove(*field);
            }
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::user::Role;

    #[test]
    fn test_public_user_hides_credentials() {
        let mut user = User::new("a@example.com", "+61412345678", "A", Role::Client);
        user.set_password("s3cret-pass").unwrap();
        let session = AuthSession::new("tok".to_string(), user);

        let public = session.public_user();
        let obj = public.as_object().unwrap();
        assert_eq!(obj["email"], "a@example.com");
        assert!(!obj.contains_key("password_hash"));
        assert!(!obj.contains_key("password_reset_token"));
    }
}
