//! Handler for PUT /api/v1/auth/reset_password/{token}

use actix_web::{web, HttpResponse};
use validator::Validate;

use cl_core::domain::entities::user::User;
use cl_core::repositories::{Repository, UserRepository};
use cl_shared::Envelope;

use crate::dto::auth::{ResetPasswordRequest, SessionPayload};
use crate::dto::validation_error;
use crate::handlers::ApiResult;

use super::{token_cookie, AppState};

/// Complete the password-reset protocol with the raw secret from the path
pub async fn reset_password<R>(
    state: web::Data<AppState<R>>,
    path: web::Path<String>,
    request: web::Json<ResetPasswordRequest>,
) -> ApiResult<HttpResponse>
where
    R: UserRepository + Repository<User> + 'static,
{
    request.validate().map_err(validation_error)?;
    let raw_token = path.into_inner();

    let session = state
        .auth_service
        .reset_password(&raw_token, &request.password, &request.password_confirm)
        .await?;

    Ok(HttpResponse::Ok()
        .cookie(token_cookie(
            &session.token,
            state.config.auth.cookie_expiry_days,
        ))
        .json(Envelope::success(
            "password reset",
            SessionPayload::from(&session),
        )))
}
