//! Handler for GET /api/v1/users (admin only)

use std::collections::HashMap;

use actix_web::{web, HttpResponse};

use cl_core::domain::entities::user::User;
use cl_core::repositories::{Repository, UserRepository};

use crate::controller;
use crate::handlers::ApiResult;
use crate::routes::auth::AppState;

/// List users with the full query surface
pub async fn list<R>(
    state: web::Data<AppState<R>>,
    query: web::Query<HashMap<String, String>>,
) -> ApiResult<HttpResponse>
where
    R: UserRepository + Repository<User> + 'static,
{
    controller::list::<User>(state.users.as_ref(), &query).await
}
