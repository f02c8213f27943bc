//! Handler for POST /api/v1/auth/login

use actix_web::{web, HttpResponse};
use validator::Validate;

use cl_core::domain::entities::user::User;
use cl_core::repositories::{Repository, UserRepository};
use cl_shared::Envelope;

use crate::dto::auth::{LoginRequest, SessionPayload};
use crate::dto::validation_error;
use crate::handlers::ApiResult;

use super::{token_cookie, AppState};

/// Authenticate with email and password
pub async fn login<R>(
    state: web::Data<AppState<R>>,
    request: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse>
where
    R: UserRepository + Repository<User> + 'static,
{
    request.validate().map_err(validation_error)?;

    let session = state
        .auth_service
        .login(&request.email, &request.password)
        .await?;

    Ok(HttpResponse::Ok()
        .cookie(token_cookie(
            &session.token,
            state.config.auth.cookie_expiry_days,
        ))
        .json(Envelope::success("logged in", SessionPayload::from(&session))))
}
