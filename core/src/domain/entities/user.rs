//! User entity representing a registered account in the CraftLink system.

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{DomainError, DomainResult};

/// Role of a user in the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A customer looking for craft services
    Client,
    /// A tradesperson offering craft services
    Craftsman,
    /// An administrator with full access
    Admin,
}

impl Default for Role {
    fn default() -> Self {
        Role::Client
    }
}

impl Role {
    /// Stable string form used in route guards and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Craftsman => "craftsman",
            Role::Admin => "admin",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "client" => Ok(Role::Client),
            "craftsman" => Ok(Role::Craftsman),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

/// User entity representing a registered account
///
/// The password is stored as a bcrypt hash and stripped from generic
/// repository output along with the other hidden fields; the reset-token
/// pair is only mutated through [`User::set_reset_token`] and
/// [`User::clear_reset_token`], which keeps the two fields in lockstep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Unique email address, case-folded at construction
    pub email: String,

    /// Mobile phone number
    pub phone: String,

    /// Display name shown to other users
    pub display_name: String,

    /// Role of the user (defaults to client)
    #[serde(default)]
    pub role: Role,

    /// Bcrypt hash of the password; never exposed through the generic
    /// repository output
    pub password_hash: String,

    /// Timestamp of the last password change
    pub password_changed_at: Option<DateTime<Utc>>,

    /// Hash of the currently live password-reset secret, if any
    pub password_reset_token: Option<String>,

    /// Absolute expiry of the live reset secret, if any
    pub password_reset_expires: Option<DateTime<Utc>>,

    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a new User with no password set yet
    ///
    /// Call [`User::set_password`] before persisting; schema validation
    /// rejects a record with an empty password hash.
    pub fn new(
        email: impl Into<String>,
        phone: impl Into<String>,
        display_name: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: cl_shared::validation::normalize_email(&email.into()),
            phone: phone.into(),
            display_name: display_name.into(),
            role,
            password_hash: String::new(),
            password_changed_at: None,
            password_reset_token: None,
            password_reset_expires: None,
            created_at: Utc::now(),
        }
    }

    /// Hashes and stores a new password
    ///
    /// Stamps `password_changed_at` and clears any live reset-token pair,
    /// so a consumed or superseded reset secret can never be replayed.
    pub fn set_password(&mut self, raw_password: &str) -> DomainResult<()> {
        self.password_hash = hash(raw_password, DEFAULT_COST).map_err(|e| DomainError::Internal {
            message: format!("Failed to hash password: {}", e),
        })?;
        self.password_changed_at = Some(Utc::now());
        self.clear_reset_token();
        Ok(())
    }

    /// Compares a candidate password against the stored hash
    ///
    /// Intentionally expensive; callers should treat a `false` result the
    /// same as an unknown email.
    pub fn verify_password(&self, candidate: &str) -> DomainResult<bool> {
        if self.password_hash.is_empty() {
            return Ok(false);
        }
        verify(candidate, &self.password_hash).map_err(|e| DomainError::Internal {
            message: format!("Failed to verify password: {}", e),
        })
    }

    /// Stores the hash of a freshly issued reset secret with its expiry
    pub fn set_reset_token(&mut self, token_hash: String, ttl: Duration) {
        self.password_reset_token = Some(token_hash);
        self.password_reset_expires = Some(Utc::now() + ttl);
    }

    /// Clears the reset-token pair (both fields together)
    pub fn clear_reset_token(&mut self) {
        self.password_reset_token = None;
        self.password_reset_expires = None;
    }

    /// Checks whether a live, unexpired reset secret exists
    pub fn has_live_reset_token(&self, now: DateTime<Utc>) -> bool {
        match (&self.password_reset_token, &self.password_reset_expires) {
            (Some(_), Some(expires)) => *expires > now,
            _ => false,
        }
    }

    /// Checks if the user is an administrator
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl crate::repositories::Document for User {
    const COLLECTION: &'static str = "users";
    const RESOURCE: &'static str = "User";

    fn id(&self) -> Uuid {
        self.id
    }

    fn validate(&self) -> DomainResult<()> {
        if !cl_shared::validation::is_valid_email(&self.email) {
            return Err(DomainError::validation("email: invalid email format"));
        }
        if !cl_shared::validation::is_valid_mobile(&self.phone) {
            return Err(DomainError::validation("phone: invalid mobile number"));
        }
        if self.display_name.trim().is_empty() {
            return Err(DomainError::validation("display_name: must not be empty"));
        }
        if self.password_hash.is_empty() {
            return Err(DomainError::validation("password: must be set"));
        }
        // The reset-token pair is either both set or both unset.
        if self.password_reset_token.is_some() != self.password_reset_expires.is_some() {
            return Err(DomainError::validation(
                "password_reset_token: token and expiry must be set together",
            ));
        }
        Ok(())
    }

    fn unique_fields() -> &'static [&'static str] {
        &["email"]
    }

    fn hidden_fields() -> &'static [&'static str] {
        &[
            "password_hash",
            "password_changed_at",
            "password_reset_token",
            "password_reset_expires",
            "created_at",
        ]
    }
}
