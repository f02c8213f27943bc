//! Handler for GET /api/v1/users/{id} (admin only)

use std::collections::HashMap;

use actix_web::{web, HttpResponse};

use cl_core::domain::entities::user::User;
use cl_core::repositories::{Repository, UserRepository};

use crate::controller;
use crate::handlers::ApiResult;
use crate::routes::auth::AppState;

use super::parse_id;

/// Fetch a single user by id
pub async fn get_one<R>(
    state: web::Data<AppState<R>>,
    path: web::Path<String>,
    query: web::Query<HashMap<String, String>>,
) -> ApiResult<HttpResponse>
where
    R: UserRepository + Repository<User> + 'static,
{
    let id = parse_id(&path)?;
    controller::get_one::<User>(state.users.as_ref(), id, &query).await
}
