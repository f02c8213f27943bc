//! Application assembly: dependency construction and route wiring.
//!
//! `build_state` wires the document store, the services and the
//! middleware dependencies; `configure` mounts every route. The
//! integration tests use both against a fresh store.

use std::sync::Arc;

use actix_web::web;

use cl_core::domain::entities::user::User;
use cl_core::repositories::{Repository, UserRepository};
use cl_core::services::auth::AuthService;
use cl_core::services::token::TokenService;
use cl_infra::{DocumentStore, LogMailer, StoreUserRepository};
use cl_shared::AppConfig;

use crate::middleware::{AuthVerifier, Protect, RequireRole};
use crate::routes;
use crate::routes::AppState;

/// Build the application state over a fresh document store
pub fn build_state(config: AppConfig) -> (web::Data<AppState<StoreUserRepository>>, web::Data<AuthVerifier>) {
    let store = DocumentStore::new();
    let users = Arc::new(StoreUserRepository::new(store));
    let token_service = Arc::new(TokenService::new(&config.auth));
    let mailer = Arc::new(LogMailer::new());

    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&users),
        Arc::clone(&token_service),
        mailer,
        config.auth.clone(),
    ));

    let verifier = web::Data::new(AuthVerifier::new(
        token_service,
        Arc::clone(&users) as Arc<dyn UserRepository>,
    ));
    let state = web::Data::new(AppState {
        auth_service,
        users,
        config,
    });

    (state, verifier)
}

/// Mount every route of the API
///
/// `/me` and `/update_me` must be registered before the admin `{id}`
/// matcher or the literal segments would never match.
pub fn configure<R>(cfg: &mut web::ServiceConfig)
where
    R: UserRepository + Repository<User> + 'static,
{
    cfg.route("/health", web::get().to(routes::health::health)).service(
        web::scope("/api/v1")
            .service(
                web::scope("/auth")
                    .route(
                        "/register",
                        web::post().to(routes::auth::register::register::<R>),
                    )
                    .route("/login", web::post().to(routes::auth::login::login::<R>))
                    .route(
                        "/forgot_password",
                        web::post().to(routes::auth::forgot_password::forgot_password::<R>),
                    )
                    .route(
                        "/reset_password/{token}",
                        web::put().to(routes::auth::reset_password::reset_password::<R>),
                    )
                    .service(
                        web::resource("/logout")
                            .wrap(Protect::new())
                            .route(web::get().to(routes::auth::logout::logout::<R>)),
                    )
                    .service(
                        web::resource("/update_password").wrap(Protect::new()).route(
                            web::patch().to(routes::auth::update_password::update_password::<R>),
                        ),
                    ),
            )
            .service(
                web::scope("/users")
                    .service(
                        web::resource("/me")
                            .wrap(Protect::new())
                            .route(web::get().to(routes::users::me::me::<R>)),
                    )
                    .service(
                        web::resource("/update_me")
                            .wrap(Protect::new())
                            .route(web::patch().to(routes::users::update_me::update_me::<R>)),
                    )
                    .service(
                        // Protect runs first, then the role gate.
                        web::scope("")
                            .wrap(RequireRole::admin())
                            .wrap(Protect::new())
                            .route("", web::get().to(routes::users::list::list::<R>))
                            .route("", web::post().to(routes::users::create::create::<R>))
                            .route("/{id}", web::get().to(routes::users::get_one::get_one::<R>))
                            .route("/{id}", web::patch().to(routes::users::update::update::<R>))
                            .route(
                                "/{id}",
                                web::delete().to(routes::users::delete::delete::<R>),
                            ),
                    ),
            ),
    );
}
