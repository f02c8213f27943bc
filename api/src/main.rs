//! CraftLink API server entry point.

use actix_web::{App, HttpServer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cl_api::handlers::error::set_environment;
use cl_api::middleware::cors::cors;
use cl_api::app;
use cl_core::domain::entities::user::{Role, User};
use cl_core::repositories::UserRepository;
use cl_infra::StoreUserRepository;
use cl_shared::AppConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();
    set_environment(config.environment);

    if config.auth.is_using_default_secret() && !config.environment.is_development() {
        warn!("JWT_SECRET is not set; running with the default secret");
    }

    let environment = config.environment;
    let server_config = config.server.clone();
    let workers = server_config.workers;

    let (state, verifier) = app::build_state(config);
    seed_admin(state.users.as_ref()).await;

    info!(
        environment = %environment,
        address = %server_config.bind_address(),
        "Starting CraftLink API"
    );

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(cors(environment))
            .app_data(state.clone())
            .app_data(verifier.clone())
            .configure(app::configure::<StoreUserRepository>)
    });

    if workers > 0 {
        server = server.workers(workers);
    }

    server.bind(server_config.bind_address())?.run().await
}

/// Create the bootstrap admin account when credentials are provided
///
/// The store starts empty on every boot, so without this there is no
/// way to reach the admin endpoints.
async fn seed_admin(users: &StoreUserRepository) {
    let (Ok(email), Ok(password)) = (
        std::env::var("ADMIN_EMAIL"),
        std::env::var("ADMIN_PASSWORD"),
    ) else {
        return;
    };

    let mut admin = User::new(&email, "+10000000000", "Administrator", Role::Admin);
    if let Err(e) = admin.set_password(&password) {
        warn!(error = %e, "Failed to hash bootstrap admin password");
        return;
    }

    match users.create(admin).await {
        Ok(user) => info!(user_id = %user.id, "Bootstrap admin account created"),
        Err(e) => warn!(error = %e, "Failed to create bootstrap admin account"),
    }
}
