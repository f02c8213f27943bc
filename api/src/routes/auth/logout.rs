//! Handler for GET /api/v1/auth/logout

use actix_web::cookie::{time, Cookie};
use actix_web::{web, HttpResponse};

use cl_core::domain::entities::user::User;
use cl_core::repositories::{Repository, UserRepository};
use cl_shared::Envelope;

use crate::middleware::auth::TOKEN_COOKIE;

use super::AppState;

/// Log out by overwriting the token cookie with the sentinel
///
/// There is no server-side session; the short-lived `none` cookie is
/// the entire mechanism.
pub async fn logout<R>(state: web::Data<AppState<R>>) -> HttpResponse
where
    R: UserRepository + Repository<User> + 'static,
{
    let sentinel = state.auth_service.logout();

    // Zero max-age makes the sentinel cookie expire immediately.
    let cookie = Cookie::build(TOKEN_COOKIE, sentinel)
        .path("/")
        .http_only(true)
        .max_age(time::Duration::ZERO)
        .finish();

    HttpResponse::Ok()
        .cookie(cookie)
        .json(Envelope::<()>::success_empty("logged out"))
}
