//! Handler for POST /api/v1/users (admin only)

use actix_web::{web, HttpResponse};
use validator::Validate;

use cl_core::domain::entities::user::{Role, User};
use cl_core::errors::DomainError;
use cl_core::repositories::{Repository, UserRepository};

use crate::controller;
use crate::dto::users::CreateUserRequest;
use crate::dto::validation_error;
use crate::handlers::ApiResult;
use crate::routes::auth::AppState;

/// Create a user directly, any role allowed
///
/// Unlike registration this is an admin operation, so assigning the
/// admin role is legitimate here.
pub async fn create<R>(
    state: web::Data<AppState<R>>,
    request: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse>
where
    R: UserRepository + Repository<User> + 'static,
{
    request.validate().map_err(validation_error)?;

    let role = match request.role.as_deref() {
        None => Role::default(),
        Some(raw) => raw
            .parse()
            .map_err(|_| DomainError::validation(format!("role: unknown role '{}'", raw)))?,
    };

    let mut user = User::new(&request.email, &request.phone, &request.display_name, role);
    user.set_password(&request.password)?;

    controller::create_one::<User>(state.users.as_ref(), user).await
}
