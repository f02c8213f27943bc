//! Bearer-token authentication middleware.
//!
//! `Protect` extracts the token from the Authorization header or the
//! `token` cookie, verifies it, confirms the account still exists, and
//! injects an [`AuthContext`] into the request. Handlers take the
//! context as an extractor.

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    web, Error, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};
use uuid::Uuid;

use cl_core::domain::entities::user::Role;
use cl_core::errors::DomainError;
use cl_core::repositories::UserRepository;
use cl_core::services::token::TokenService;

use crate::handlers::ApiError;

/// Cookie the client may carry the bearer token in
pub const TOKEN_COOKIE: &str = "token";

/// Sentinel value a logout writes into the token cookie
pub const LOGGED_OUT_SENTINEL: &str = "none";

/// Authenticated user context injected into requests
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// User ID extracted from the verified token
    pub user_id: Uuid,
    /// Role of the account at the time of the request
    pub role: Role,
}

/// Verification dependencies shared with the middleware through app data
pub struct AuthVerifier {
    token_service: Arc<TokenService>,
    users: Arc<dyn UserRepository>,
}

impl AuthVerifier {
    pub fn new(token_service: Arc<TokenService>, users: Arc<dyn UserRepository>) -> Self {
        Self {
            token_service,
            users,
        }
    }

    /// Verify a raw token and load the account behind it
    async fn authenticate(&self, token: &str) -> Result<AuthContext, DomainError> {
        let user_id = self.token_service.verify(token)?;

        // A token outliving its account is still an invalid login.
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::Unauthenticated)?;

        Ok(AuthContext {
            user_id: user.id,
            role: user.role,
        })
    }
}

/// Authentication middleware factory
#[derive(Default)]
pub struct Protect;

impl Protect {
    pub fn new() -> Self {
        Self
    }
}

impl<S, B> Transform<S, ServiceRequest> for Protect
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = ProtectMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ProtectMiddleware {
            service: Rc::new(service),
        }))
    }
}

/// Authentication middleware service
pub struct ProtectMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for ProtectMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let Some(token) = extract_token(&req) else {
                return Err(ApiError(DomainError::Unauthenticated).into());
            };

            let Some(verifier) = req.app_data::<web::Data<AuthVerifier>>() else {
                return Err(ApiError(DomainError::Internal {
                    message: "Authentication verifier not configured".to_string(),
                })
                .into());
            };

            let context = verifier
                .authenticate(&token)
                .await
                .map_err(ApiError::from)?;
            req.extensions_mut().insert(context);

            service.call(req).await
        })
    }
}

/// Extract the bearer token from the header or the cookie
///
/// The logout sentinel in the cookie counts as no token at all.
fn extract_token(req: &ServiceRequest) -> Option<String> {
    let from_header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.to_string());

    from_header.or_else(|| {
        req.cookie(TOKEN_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| value != LOGGED_OUT_SENTINEL)
    })
}

/// Extractor for the authenticated user context
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| ApiError(DomainError::Unauthenticated).into());

        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    // Imported under another name so `#[test]` keeps resolving to the
    // built-in attribute rather than actix-web's async macro.
    use actix_web::test::TestRequest;

    #[test]
    fn test_extract_token_from_bearer_header() {
        let req = TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer token_123"))
            .to_srv_request();
        assert_eq!(extract_token(&req), Some("token_123".to_string()));

        let req_no_bearer = TestRequest::default()
            .insert_header((AUTHORIZATION, "token_123"))
            .to_srv_request();
        assert_eq!(extract_token(&req_no_bearer), None);
    }

    #[test]
    fn test_extract_token_from_cookie() {
        let req = TestRequest::default()
            .cookie(actix_web::cookie::Cookie::new(TOKEN_COOKIE, "token_456"))
            .to_srv_request();
        assert_eq!(extract_token(&req), Some("token_456".to_string()));
    }

    #[test]
    fn test_logout_sentinel_counts_as_no_token() {
        let req = TestRequest::default()
            .cookie(actix_web::cookie::Cookie::new(
                TOKEN_COOKIE,
                LOGGED_OUT_SENTINEL,
            ))
            .to_srv_request();
        assert_eq!(extract_token(&req), None);
    }
}
