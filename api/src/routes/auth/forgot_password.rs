//! Handler for POST /api/v1/auth/forgot_password

use actix_web::{web, HttpResponse};
use validator::Validate;

use cl_core::domain::entities::user::User;
use cl_core::repositories::{Repository, UserRepository};
use cl_shared::Envelope;

use crate::dto::auth::{ForgotPasswordRequest, ResetIssuedPayload};
use crate::dto::validation_error;
use crate::handlers::ApiResult;

use super::AppState;

/// Begin the password-reset protocol
///
/// The raw secret normally leaves only through the mailer; development
/// responses carry it in-band so the flow can be exercised without a
/// mail transport.
pub async fn forgot_password<R>(
    state: web::Data<AppState<R>>,
    request: web::Json<ForgotPasswordRequest>,
) -> ApiResult<HttpResponse>
where
    R: UserRepository + Repository<User> + 'static,
{
    request.validate().map_err(validation_error)?;

    let raw_token = state.auth_service.forget_password(&request.email).await?;

    if state.config.environment.is_development() {
        return Ok(HttpResponse::Ok().json(Envelope::success(
            "reset token issued",
            ResetIssuedPayload {
                reset_token: raw_token,
            },
        )));
    }

    Ok(HttpResponse::Ok().json(Envelope::<()>::success_empty("reset token sent to email")))
}
