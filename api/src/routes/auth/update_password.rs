//! Handler for PATCH /api/v1/auth/update_password (protected)

use actix_web::{web, HttpResponse};
use validator::Validate;

use cl_core::domain::entities::user::User;
use cl_core::repositories::{Repository, UserRepository};
use cl_shared::Envelope;

use crate::dto::auth::{SessionPayload, UpdatePasswordRequest};
use crate::dto::validation_error;
use crate::handlers::ApiResult;
use crate::middleware::AuthContext;

use super::{token_cookie, AppState};

/// Change the caller's password, re-checking the current one
///
/// Responds with a fresh session so the client replaces its pre-change
/// token immediately.
pub async fn update_password<R>(
    auth: AuthContext,
    state: web::Data<AppState<R>>,
    request: web::Json<UpdatePasswordRequest>,
) -> ApiResult<HttpResponse>
where
    R: UserRepository + Repository<User> + 'static,
{
    request.validate().map_err(validation_error)?;

    let session = state
        .auth_service
        .update_password(
            auth.user_id,
            &request.current_password,
            &request.password,
            &request.password_confirm,
        )
        .await?;

    Ok(HttpResponse::Ok()
        .cookie(token_cookie(
            &session.token,
            state.config.auth.cookie_expiry_days,
        ))
        .json(Envelope::success(
            "password updated",
            SessionPayload::from(&session),
        )))
}
