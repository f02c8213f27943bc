//! Handler for PATCH /api/v1/users/update_me (protected)

use actix_web::{web, HttpResponse};
use validator::Validate;

use cl_core::domain::entities::user::User;
use cl_core::repositories::{Repository, UserRepository};
use cl_shared::Envelope;

use crate::dto::users::UpdateMeRequest;
use crate::dto::validation_error;
use crate::handlers::ApiResult;
use crate::middleware::AuthContext;
use crate::routes::auth::AppState;

/// Update the caller's own profile fields
pub async fn update_me<R>(
    auth: AuthContext,
    state: web::Data<AppState<R>>,
    request: web::Json<UpdateMeRequest>,
) -> ApiResult<HttpResponse>
where
    R: UserRepository + Repository<User> + 'static,
{
    request.validate().map_err(validation_error)?;

    let updated = state
        .auth_service
        .update_me(auth.user_id, request.into_inner().into_fields())
        .await?;

    Ok(HttpResponse::Ok().json(Envelope::success("updated", updated)))
}
