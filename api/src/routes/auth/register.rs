//! Handler for POST /api/v1/auth/register

use actix_web::{web, HttpResponse};
use validator::Validate;

use cl_core::domain::entities::user::User;
use cl_core::repositories::{Repository, UserRepository};
use cl_shared::Envelope;

use crate::dto::auth::{RegisterRequest, SessionPayload};
use crate::dto::validation_error;
use crate::handlers::ApiResult;

use super::{parse_role, token_cookie, AppState};

/// Register a new account and log it straight in
///
/// Returns 201 with the session payload; the token also travels in the
/// `token` cookie.
pub async fn register<R>(
    state: web::Data<AppState<R>>,
    request: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse>
where
    R: UserRepository + Repository<User> + 'static,
{
    request.validate().map_err(validation_error)?;
    let role = parse_role(request.role.as_deref())?;

    let session = state
        .auth_service
        .register(
            &request.email,
            &request.phone,
            &request.display_name,
            role,
            &request.password,
            &request.password_confirm,
        )
        .await?;

    Ok(HttpResponse::Created()
        .cookie(token_cookie(
            &session.token,
            state.config.auth.cookie_expiry_days,
        ))
        .json(Envelope::success(
            "registered",
            SessionPayload::from(&session),
        )))
}
