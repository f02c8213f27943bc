//! Handler for PATCH /api/v1/users/{id} (admin only)

use actix_web::{web, HttpResponse};
use validator::Validate;

use cl_core::domain::entities::user::User;
use cl_core::repositories::{Repository, UserRepository};

use crate::controller;
use crate::dto::users::UpdateUserRequest;
use crate::dto::validation_error;
use crate::handlers::ApiResult;
use crate::routes::auth::AppState;

use super::parse_id;

/// Merge profile fields into a user record
pub async fn update<R>(
    state: web::Data<AppState<R>>,
    path: web::Path<String>,
    request: web::Json<UpdateUserRequest>,
) -> ApiResult<HttpResponse>
where
    R: UserRepository + Repository<User> + 'static,
{
    let id = parse_id(&path)?;
    request.validate().map_err(validation_error)?;

    controller::update_one::<User>(state.users.as_ref(), id, request.into_inner().into_fields())
        .await
}
