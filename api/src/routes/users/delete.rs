//! Handler for DELETE /api/v1/users/{id} (admin only)

use actix_web::{web, HttpResponse};

use cl_core::domain::entities::user::User;
use cl_core::repositories::{Repository, UserRepository};

use crate::controller;
use crate::handlers::ApiResult;
use crate::routes::auth::AppState;

use super::parse_id;

/// Delete a user by id
pub async fn delete<R>(
    state: web::Data<AppState<R>>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse>
where
    R: UserRepository + Repository<User> + 'static,
{
    let id = parse_id(&path)?;
    controller::delete_one::<User>(state.users.as_ref(), id).await
}
