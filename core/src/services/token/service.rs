//! Stateless bearer-token signing and verification.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use cl_shared::AuthConfig;

use crate::domain::entities::token::Claims;
use crate::errors::{DomainResult, TokenError};

/// Service for issuing and verifying HS256 bearer tokens
///
/// Tokens carry only the subject and an expiry window. There is no
/// server-side session state, so logout is purely a client-side affair.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expiry_secs: i64,
}

impl TokenService {
    /// Create a token service from the auth configuration
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            token_expiry_secs: config.token_expiry_secs,
        }
    }

    /// Sign a bearer token for the given user
    pub fn sign(&self, user_id: Uuid) -> DomainResult<String> {
        let claims = Claims::new(user_id, self.token_expiry_secs);

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|_| TokenError::TokenGenerationFailed)?;

        Ok(token)
    }

    /// Verify a bearer token and extract the user id
    ///
    /// Expiry and signature failures map to distinct errors; every other
    /// decode failure is reported as a malformed token.
    pub fn verify(&self, token: &str) -> DomainResult<Uuid> {
        let validation = Validation::new(Algorithm::HS256);

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::InvalidTokenFormat,
            }
        })?;

        let user_id = data
            .claims
            .user_id()
            .map_err(|_| TokenError::InvalidTokenFormat)?;

        Ok(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        let config = AuthConfig::new("test-secret-at-least-32-chars-long");
        TokenService::new(&config)
    }

    #[test]
    fn test_sign_and_verify_round_trip() {
        let service = service();
        let user_id = Uuid::new_v4();

        let token = service.sign(user_id).unwrap();
        let verified = service.verify(&token).unwrap();

        assert_eq!(verified, user_id);
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let service = service();
        let err = service.verify("not-a-jwt").unwrap_err();
        assert!(matches!(
            err,
            crate::errors::DomainError::Token(TokenError::InvalidTokenFormat)
        ));
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let service = service();
        let other = TokenService::new(&AuthConfig::new("another-secret-also-32-chars-long!"));

        let token = other.sign(Uuid::new_v4()).unwrap();
        let err = service.verify(&token).unwrap_err();
        assert!(matches!(
            err,
            crate::errors::DomainError::Token(TokenError::InvalidSignature)
        ));
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        let mut config = AuthConfig::new("test-secret-at-least-32-chars-long");
        config.token_expiry_secs = -120;
        let service = TokenService::new(&config);

        let token = service.sign(Uuid::new_v4()).unwrap();
        let err = service.verify(&token).unwrap_err();
        assert!(matches!(
            err,
            crate::errors::DomainError::Token(TokenError::TokenExpired)
        ));
    }
}
