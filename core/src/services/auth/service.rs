//! Authentication service implementation.
//!
//! Owns the credential lifecycle: registration, login, the two-phase
//! password-reset protocol, and authenticated password changes. Every
//! path that ends in an authenticated state returns a fresh
//! [`AuthSession`] so the client never has to reuse a pre-change token.

use std::sync::Arc;

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use tracing::{info, warn};
use uuid::Uuid;

use cl_shared::AuthConfig;

use crate::domain::entities::user::{Role, User};
use crate::domain::value_objects::auth_session::AuthSession;
use crate::errors::{AuthError, DomainError, DomainResult};
use crate::repositories::{Repository, UserRepository};
use crate::services::mailer::Mailer;
use crate::services::token::TokenService;

/// Length of the raw password-reset secret
const RESET_TOKEN_LENGTH: usize = 32;

/// Fields that must never be written through the profile-update path
const PASSWORD_FIELDS: &[&str] = &["password", "password_confirm", "password_hash"];

/// Service handling authentication business logic
///
/// Generic over the user repository so unit tests can run against the
/// in-memory mock while production wires the document store.
pub struct AuthService<R>
where
    R: UserRepository + Repository<User>,
{
    user_repository: Arc<R>,
    token_service: Arc<TokenService>,
    mailer: Arc<dyn Mailer>,
    config: AuthConfig,
}

impl<R> AuthService<R>
where
    R: UserRepository + Repository<User>,
{
    /// Create a new authentication service
    pub fn new(
        user_repository: Arc<R>,
        token_service: Arc<TokenService>,
        mailer: Arc<dyn Mailer>,
        config: AuthConfig,
    ) -> Self {
        Self {
            user_repository,
            token_service,
            mailer,
            config,
        }
    }

    /// Register a new account and log it in
    ///
    /// # Flow
    /// 1. Check the two password fields agree
    /// 2. Build the user, hash the password
    /// 3. Persist (duplicate email and schema validation fail here)
    /// 4. Sign a bearer token for the new account
    pub async fn register(
        &self,
        email: &str,
        phone: &str,
        display_name: &str,
        role: Role,
        password: &str,
        password_confirm: &str,
    ) -> DomainResult<AuthSession> {
        // Step 1: confirmation must match before anything is hashed
        if password != password_confirm {
            return Err(AuthError::PasswordMismatch.into());
        }

        // Step 2: build and hash
        let mut user = User::new(email, phone, display_name, role);
        user.set_password(password)?;

        // Step 3: persist; duplicate email surfaces as a duplicate error
        let user = self.user_repository.create(user).await?;

        info!(user_id = %user.id, "New account registered");

        // Step 4: fresh session
        self.session_for(user)
    }

    /// Authenticate with email and password
    ///
    /// Unknown email and wrong password produce the same error, so the
    /// response never confirms whether an address is registered.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<AuthSession> {
        let email = cl_shared::validation::normalize_email(email);

        let user = self
            .user_repository
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.verify_password(password)? {
            return Err(AuthError::InvalidCredentials.into());
        }

        self.session_for(user)
    }

    /// Begin the password-reset protocol
    ///
    /// Issues a single-use secret, stores only its hash with an expiry,
    /// and hands the raw secret to the mailer. When delivery fails the
    /// issued token is rolled back so no orphaned secret stays live.
    /// Returns the raw secret for environments that expose it in-band.
    pub async fn forget_password(&self, email: &str) -> DomainResult<String> {
        let email = cl_shared::validation::normalize_email(email);

        // The reset path does reveal account existence; the caller asked
        // for a recovery email, not a login.
        let mut user = self
            .user_repository
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        // Step 1: issue the secret; only its hash is persisted
        let raw_token = generate_reset_token();
        let ttl = chrono::Duration::minutes(self.config.reset_token_ttl_minutes);
        user.set_reset_token(hash_token(&raw_token), ttl);

        // Step 2: write without schema validation so an otherwise-stale
        // record cannot block recovery
        let user = self.user_repository.save_unchecked(user).await?;

        // Step 3: deliver out of band; roll back on failure
        if let Err(e) = self.mailer.send_password_reset(&user.email, &raw_token).await {
            warn!(user_id = %user.id, "Reset delivery failed, rolling token back");
            self.rollback_password_reset(user).await?;
            return Err(e);
        }

        info!(user_id = %user.id, "Password reset token issued");

        Ok(raw_token)
    }

    /// Undo a reset issuance whose delivery failed
    ///
    /// Clears the token pair and persists without validation, restoring
    /// the pre-request state.
    pub async fn rollback_password_reset(&self, mut user: User) -> DomainResult<()> {
        user.clear_reset_token();
        self.user_repository.save_unchecked(user).await?;
        Ok(())
    }

    /// Complete the password-reset protocol
    ///
    /// The raw secret is hashed and matched together with its expiry in a
    /// single lookup; a stale or unknown secret gives one uniform error.
    /// Setting the new password consumes the token pair.
    pub async fn reset_password(
        &self,
        raw_token: &str,
        password: &str,
        password_confirm: &str,
    ) -> DomainResult<AuthSession> {
        if password != password_confirm {
            return Err(AuthError::PasswordMismatch.into());
        }

        // Hash-and-match atomically; no separate expiry check
        let mut user = self
            .user_repository
            .find_by_reset_token(&hash_token(raw_token), chrono::Utc::now())
            .await?
            .ok_or(AuthError::InvalidOrExpiredToken)?;

        // Consumes the token pair and stamps password_changed_at
        user.set_password(password)?;
        let user = self.user_repository.save(user).await?;

        info!(user_id = %user.id, "Password reset completed");

        self.session_for(user)
    }

    /// Change the password of an authenticated user
    ///
    /// Requires the current password even though the caller already holds
    /// a valid bearer token.
    pub async fn update_password(
        &self,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
        new_password_confirm: &str,
    ) -> DomainResult<AuthSession> {
        if new_password != new_password_confirm {
            return Err(AuthError::PasswordMismatch.into());
        }

        let mut user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !user.verify_password(current_password)? {
            return Err(AuthError::InvalidCredentials.into());
        }

        user.set_password(new_password)?;
        let user = self.user_repository.save(user).await?;

        info!(user_id = %user.id, "Password updated");

        self.session_for(user)
    }

    /// Fetch the authenticated user's own record
    ///
    /// Trusts the identifier from the verified token; no further
    /// ownership check is performed here.
    pub async fn get_me(&self, user_id: Uuid) -> DomainResult<Value> {
        self.user_repository
            .get_one_by_id(user_id, &[])
            .await?
            .ok_or_else(|| DomainError::not_found("User"))
    }

    /// Update the authenticated user's own profile fields
    ///
    /// Password material is rejected outright; changing a password goes
    /// through [`AuthService::update_password`].
    pub async fn update_me(
        &self,
        user_id: Uuid,
        fields: Map<String, Value>,
    ) -> DomainResult<Value> {
        if PASSWORD_FIELDS.iter().any(|f| fields.contains_key(*f)) {
            return Err(DomainError::validation(
                "This route is not for password updates, use /update_password",
            ));
        }

        self.user_repository
            .update_one_by_id(user_id, fields)
            .await?
            .ok_or_else(|| DomainError::not_found("User"))
    }

    /// Log out
    ///
    /// There is no server-side session to destroy; the sentinel value
    /// overwrites the client's token cookie.
    pub fn logout(&self) -> &'static str {
        "none"
    }

    /// Sign a fresh token and pair it with the user
    fn session_for(&self, user: User) -> DomainResult<AuthSession> {
        let token = self.token_service.sign(user.id)?;
        Ok(AuthSession { token, user })
    }
}

/// Generate a raw password-reset secret (alphanumeric)
pub fn generate_reset_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(RESET_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Hash a reset secret for storage or lookup (SHA-256, hex-encoded)
pub fn hash_token(raw_token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw_token.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MockUserRepository;
    use crate::services::mailer::Mailer;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct NullMailer;

    #[async_trait]
    impl Mailer for NullMailer {
        async fn send_password_reset(&self, _email: &str, _raw_token: &str) -> DomainResult<()> {
            Ok(())
        }
    }

    struct FailingMailer {
        called: AtomicBool,
    }

    #[async_trait]
    impl Mailer for FailingMailer {
        async fn send_password_reset(&self, _email: &str, _raw_token: &str) -> DomainResult<()> {
            self.called.store(true, Ordering::SeqCst);
            Err(DomainError::Internal {
                message: "smtp unreachable".to_string(),
            })
        }
    }

    fn service_with(mailer: Arc<dyn Mailer>) -> (AuthService<MockUserRepository>, Arc<MockUserRepository>) {
        let repo = Arc::new(MockUserRepository::new());
        let config = AuthConfig::new("test-secret-at-least-32-chars-long");
        let tokens = Arc::new(TokenService::new(&config));
        (
            AuthService::new(Arc::clone(&repo), tokens, mailer, config),
            repo,
        )
    }

    fn service() -> (AuthService<MockUserRepository>, Arc<MockUserRepository>) {
        service_with(Arc::new(NullMailer))
    }

    async fn register_jane(service: &AuthService<MockUserRepository>) -> AuthSession {
        service
            .register(
                "jane@example.com",
                "+61412345678",
                "Jane",
                Role::Client,
                "s3cret-pass",
                "s3cret-pass",
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_register_returns_session_with_valid_token() {
        let (service, _) = service();
        let session = register_jane(&service).await;

        assert!(!session.token.is_empty());
        assert_eq!(session.user.email, "jane@example.com");
        assert_ne!(session.user.password_hash, "s3cret-pass");
    }

    #[tokio::test]
    async fn test_register_rejects_mismatched_confirmation() {
        let (service, _) = service();
        let err = service
            .register(
                "jane@example.com",
                "+61412345678",
                "Jane",
                Role::Client,
                "s3cret-pass",
                "different",
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Auth(AuthError::PasswordMismatch)));
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email() {
        let (service, _) = service();
        register_jane(&service).await;

        let err = service
            .register(
                "JANE@example.com",
                "+61412345679",
                "Jane Two",
                Role::Client,
                "s3cret-pass",
                "s3cret-pass",
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Duplicate { .. }));
    }

    #[tokio::test]
    async fn test_login_succeeds_with_correct_credentials() {
        let (service, _) = service();
        register_jane(&service).await;

        let session = service.login("Jane@Example.com", "s3cret-pass").await.unwrap();
        assert_eq!(session.user.email, "jane@example.com");
    }

    #[tokio::test]
    async fn test_login_wrong_password_and_unknown_email_are_indistinguishable() {
        let (service, _) = service();
        register_jane(&service).await;

        let wrong_password = service
            .login("jane@example.com", "wrong")
            .await
            .unwrap_err();
        let unknown_email = service
            .login("nobody@example.com", "s3cret-pass")
            .await
            .unwrap_err();

        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn test_forget_password_stores_hash_not_raw_secret() {
        let (service, repo) = service();
        let registered = register_jane(&service).await;

        let raw = service.forget_password("jane@example.com").await.unwrap();

        let stored = repo.find_by_id(registered.user.id).await.unwrap().unwrap();
        let stored_hash = stored.password_reset_token.unwrap();
        assert_ne!(stored_hash, raw);
        assert_eq!(stored_hash, hash_token(&raw));
        assert!(stored.password_reset_expires.is_some());
    }

    #[tokio::test]
    async fn test_forget_password_unknown_email_fails() {
        let (service, _) = service();
        let err = service.forget_password("nobody@example.com").await.unwrap_err();
        assert!(matches!(err, DomainError::Auth(AuthError::UserNotFound)));
    }

    #[tokio::test]
    async fn test_forget_password_rolls_back_when_delivery_fails() {
        let mailer = Arc::new(FailingMailer {
            called: AtomicBool::new(false),
        });
        let (service, repo) = service_with(mailer.clone());
        let registered = register_jane(&service).await;

        let err = service.forget_password("jane@example.com").await.unwrap_err();
        assert!(matches!(err, DomainError::Internal { .. }));
        assert!(mailer.called.load(Ordering::SeqCst));

        // Token pair must be gone after the rollback.
        let stored = repo.find_by_id(registered.user.id).await.unwrap().unwrap();
        assert!(stored.password_reset_token.is_none());
        assert!(stored.password_reset_expires.is_none());
    }

    #[tokio::test]
    async fn test_rolled_back_token_cannot_reset_the_password() {
        let (service, repo) = service();
        let registered = register_jane(&service).await;
        let raw = service.forget_password("jane@example.com").await.unwrap();

        let user = repo.find_by_id(registered.user.id).await.unwrap().unwrap();
        service.rollback_password_reset(user).await.unwrap();

        // The secret issued before the rollback is dead.
        let err = service
            .reset_password(&raw, "new-password", "new-password")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::Auth(AuthError::InvalidOrExpiredToken)
        ));
    }

    #[tokio::test]
    async fn test_reset_password_consumes_token_and_logs_in() {
        let (service, repo) = service();
        let registered = register_jane(&service).await;
        let raw = service.forget_password("jane@example.com").await.unwrap();

        let session = service
            .reset_password(&raw, "new-password", "new-password")
            .await
            .unwrap();
        assert!(!session.token.is_empty());

        // New password works, old one does not.
        assert!(service.login("jane@example.com", "new-password").await.is_ok());
        assert!(service.login("jane@example.com", "s3cret-pass").await.is_err());

        // The token is single-use.
        let stored = repo.find_by_id(registered.user.id).await.unwrap().unwrap();
        assert!(stored.password_reset_token.is_none());
        let replay = service
            .reset_password(&raw, "another-pass", "another-pass")
            .await
            .unwrap_err();
        assert!(matches!(
            replay,
            DomainError::Auth(AuthError::InvalidOrExpiredToken)
        ));
    }

    #[tokio::test]
    async fn test_reset_password_rejects_unknown_secret() {
        let (service, _) = service();
        register_jane(&service).await;

        let err = service
            .reset_password("bogus-token", "new-password", "new-password")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::Auth(AuthError::InvalidOrExpiredToken)
        ));
    }

    #[tokio::test]
    async fn test_reset_password_rejects_expired_secret() {
        let (service, repo) = service();
        let registered = register_jane(&service).await;
        let raw = service.forget_password("jane@example.com").await.unwrap();

        // Age the expiry past the window.
        let mut user = repo.find_by_id(registered.user.id).await.unwrap().unwrap();
        user.password_reset_expires = Some(chrono::Utc::now() - chrono::Duration::minutes(1));
        repo.save_unchecked(user).await.unwrap();

        let err = service
            .reset_password(&raw, "new-password", "new-password")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::Auth(AuthError::InvalidOrExpiredToken)
        ));
    }

    #[tokio::test]
    async fn test_update_password_requires_current_password() {
        let (service, _) = service();
        let registered = register_jane(&service).await;

        let err = service
            .update_password(registered.user.id, "wrong", "new-password", "new-password")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::Auth(AuthError::InvalidCredentials)
        ));

        let session = service
            .update_password(
                registered.user.id,
                "s3cret-pass",
                "new-password",
                "new-password",
            )
            .await
            .unwrap();
        assert!(!session.token.is_empty());
        assert!(service.login("jane@example.com", "new-password").await.is_ok());
    }

    #[tokio::test]
    async fn test_get_me_hides_sensitive_fields() {
        let (service, _) = service();
        let registered = register_jane(&service).await;

        let me = service.get_me(registered.user.id).await.unwrap();
        let obj = me.as_object().unwrap();
        assert_eq!(obj["email"], "jane@example.com");
        assert!(!obj.contains_key("password_hash"));
        assert!(!obj.contains_key("password_reset_token"));
    }

    #[tokio::test]
    async fn test_update_me_updates_profile_fields() {
        let (service, _) = service();
        let registered = register_jane(&service).await;

        let mut fields = Map::new();
        fields.insert("display_name".to_string(), Value::String("Janet".to_string()));

        let updated = service.update_me(registered.user.id, fields).await.unwrap();
        assert_eq!(updated["display_name"], "Janet");
    }

    #[tokio::test]
    async fn test_update_me_rejects_password_fields() {
        let (service, _) = service();
        let registered = register_jane(&service).await;

        let mut fields = Map::new();
        fields.insert("password".to_string(), Value::String("sneaky".to_string()));

        let err = service.update_me(registered.user.id, fields).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_logout_returns_sentinel() {
        let (service, _) = service();
        assert_eq!(service.logout(), "none");
    }

    #[test]
    fn test_generated_tokens_are_unique_and_alphanumeric() {
        let a = generate_reset_token();
        let b = generate_reset_token();
        assert_eq!(a.len(), RESET_TOKEN_LENGTH);
        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_hash_token_is_deterministic_hex() {
        let h1 = hash_token("secret");
        let h2 = hash_token("secret");
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 64);
        assert_ne!(h1, hash_token("other"));
    }
}
