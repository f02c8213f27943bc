//! Handler for GET /api/v1/users/me (protected)

use actix_web::{web, HttpResponse};

use cl_core::domain::entities::user::User;
use cl_core::repositories::{Repository, UserRepository};
use cl_shared::Envelope;

use crate::handlers::ApiResult;
use crate::middleware::AuthContext;
use crate::routes::auth::AppState;

/// Fetch the caller's own record
pub async fn me<R>(auth: AuthContext, state: web::Data<AppState<R>>) -> ApiResult<HttpResponse>
where
    R: UserRepository + Repository<User> + 'static,
{
    let user = state.auth_service.get_me(auth.user_id).await?;
    Ok(HttpResponse::Ok().json(Envelope::success("fetched", user)))
}
