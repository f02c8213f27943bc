//! Authentication route handlers
//!
//! Endpoints for registration, login, the password-reset protocol,
//! authenticated password changes and logout.

pub mod forgot_password;
pub mod login;
pub mod logout;
pub mod register;
pub mod reset_password;
pub mod update_password;

use std::sync::Arc;

use actix_web::cookie::{time, Cookie};

use cl_core::domain::entities::user::{Role, User};
use cl_core::errors::DomainError;
use cl_core::repositories::{Repository, UserRepository};
use cl_core::services::auth::AuthService;
use cl_shared::AppConfig;

use crate::handlers::ApiError;
use crate::middleware::auth::TOKEN_COOKIE;

/// Application state that holds the shared services
pub struct AppState<R>
where
    R: UserRepository + Repository<User>,
{
    pub auth_service: Arc<AuthService<R>>,
    pub users: Arc<R>,
    pub config: AppConfig,
}

/// Build the bearer-token cookie attached to every login-like response
pub(crate) fn token_cookie(token: &str, expiry_days: i64) -> Cookie<'static> {
    Cookie::build(TOKEN_COOKIE, token.to_string())
        .path("/")
        .http_only(true)
        .max_age(time::Duration::days(expiry_days))
        .finish()
}

/// Parse a requested role, disallowing self-assigned admin
pub(crate) fn parse_role(role: Option<&str>) -> Result<Role, ApiError> {
    let Some(role) = role else {
        return Ok(Role::default());
    };

    let role: Role = role
        .parse()
        .map_err(|_| DomainError::validation(format!("role: unknown role '{}'", role)))?;

    if role == Role::Admin {
        return Err(DomainError::validation("role: admin cannot be self-assigned").into());
    }
    Ok(role)
}
