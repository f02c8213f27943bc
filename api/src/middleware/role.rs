//! Role gate middleware.
//!
//! Runs behind `Protect`: the request must already carry an
//! [`AuthContext`]. Accounts whose role is not in the allow-list get a
//! 403 without the handler ever running.

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    task::{Context, Poll},
};

use cl_core::domain::entities::user::Role;
use cl_core::errors::DomainError;

use crate::handlers::ApiError;
use crate::middleware::auth::AuthContext;

/// Role gate middleware factory
pub struct RequireRole {
    allowed: Rc<Vec<Role>>,
}

impl RequireRole {
    /// Allow only the given roles through
    pub fn any_of(roles: &[Role]) -> Self {
        Self {
            allowed: Rc::new(roles.to_vec()),
        }
    }

    /// Allow administrators only
    pub fn admin() -> Self {
        Self::any_of(&[Role::Admin])
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            allowed: Rc::clone(&self.allowed),
        }))
    }
}

/// Role gate middleware service
pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    allowed: Rc<Vec<Role>>,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let allowed = Rc::clone(&self.allowed);

        Box::pin(async move {
            let role = req.extensions().get::<AuthContext>().map(|ctx| ctx.role);

            match role {
                None => Err(ApiError(DomainError::Unauthenticated).into()),
                Some(role) if !allowed.contains(&role) => {
                    Err(ApiError(DomainError::Forbidden).into())
                }
                Some(_) => service.call(req).await,
            }
        })
    }
}
