//! Out-of-band delivery seam for the password-reset secret.

use async_trait::async_trait;

use crate::errors::DomainResult;

/// Delivery channel for the raw password-reset secret
///
/// The raw secret is never persisted; this trait is the only place it
/// leaves the process. A failed delivery makes the auth service roll the
/// issued token back, so implementations should return an error rather
/// than swallow one.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver the raw reset secret to the account's email address
    async fn send_password_reset(&self, email: &str, raw_token: &str) -> DomainResult<()>;
}
