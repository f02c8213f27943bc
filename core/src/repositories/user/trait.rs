//! User repository trait defining the interface for user persistence.
//!
//! Unlike the generic repository, these operations return the typed entity
//! with the password hash included; the authentication service needs it for
//! credential verification. Everything user-facing goes through the generic
//! surface instead.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

/// Repository trait for User entity persistence operations
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by their case-folded email address
    ///
    /// The returned entity includes the password hash; callers are the
    /// authentication paths that need it.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Find a user by their unique identifier
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// Find the user holding a live reset token
    ///
    /// Matches the stored token hash AND a still-future expiry in a single
    /// filtered query; there is no separate existence-then-expiry check.
    async fn find_by_reset_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, DomainError>;

    /// Validate and persist a new user
    ///
    /// Fails with a duplicate error when the email is already registered.
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Persist changes to an existing user, running full schema validation
    async fn save(&self, user: User) -> Result<User, DomainError>;

    /// Persist changes without running schema validation
    ///
    /// Used by the password-reset request path, which must write the
    /// reset-token pair even if unrelated validators would object.
    async fn save_unchecked(&self, user: User) -> Result<User, DomainError>;
}
