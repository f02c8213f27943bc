//! Authentication and token configuration

use serde::{Deserialize, Serialize};

/// Configuration for token issuance and the password-reset protocol
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Secret key for signing bearer tokens
    pub jwt_secret: String,

    /// Bearer token expiry in seconds
    pub token_expiry_secs: i64,

    /// Cookie expiry in days (bearer cookie transport)
    pub cookie_expiry_days: i64,

    /// Password-reset token time-to-live in minutes
    #[serde(default = "default_reset_token_ttl")]
    pub reset_token_ttl_minutes: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::from("change-this-secret-in-production"),
            token_expiry_secs: 86_400, // 1 day
            cookie_expiry_days: 7,
            reset_token_ttl_minutes: default_reset_token_ttl(),
        }
    }
}

impl AuthConfig {
    /// Create a new configuration with an explicit secret
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            ..Default::default()
        }
    }

    /// Set the token expiry in hours
    pub fn with_token_expiry_hours(mut self, hours: i64) -> Self {
        self.token_expiry_secs = hours * 3600;
        self
    }

    /// Set the cookie expiry in days
    pub fn with_cookie_expiry_days(mut self, days: i64) -> Self {
        self.cookie_expiry_days = days;
        self
    }

    /// Check if the default secret is still in use (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.jwt_secret == "change-this-secret-in-production"
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let jwt_secret = std::env::var("JWT_SECRET")
            .unwrap_or_else(|_| "change-this-secret-in-production".to_string());
        let token_expiry_secs = std::env::var("JWT_TOKEN_EXPIRY_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(86_400);
        let cookie_expiry_days = std::env::var("JWT_COOKIE_EXPIRY_DAYS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(7);
        let reset_token_ttl_minutes = std::env::var("RESET_TOKEN_TTL_MINUTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_reset_token_ttl);

        Self {
            jwt_secret,
            token_expiry_secs,
            cookie_expiry_days,
            reset_token_ttl_minutes,
        }
    }
}

fn default_reset_token_ttl() -> i64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_config_default() {
        let config = AuthConfig::default();
        assert_eq!(config.token_expiry_secs, 86_400);
        assert_eq!(config.cookie_expiry_days, 7);
        assert_eq!(config.reset_token_ttl_minutes, 10);
        assert!(config.is_using_default_secret());
    }

    #[test]
    fn test_auth_config_builder() {
        let config = AuthConfig::new("my-secret")
            .with_token_expiry_hours(2)
            .with_cookie_expiry_days(30);

        assert_eq!(config.token_expiry_secs, 7200);
        assert_eq!(config.cookie_expiry_days, 30);
        assert!(!config.is_using_default_secret());
    }
}
