//! CORS policy construction.

use actix_cors::Cors;
use actix_web::http::header;

use cl_shared::Environment;

/// Build the CORS policy for the running environment
///
/// Development allows any origin; elsewhere the allowed origin comes
/// from `CORS_ALLOWED_ORIGIN`.
pub fn cors(environment: Environment) -> Cors {
    let base = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE"])
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE])
        .supports_credentials()
        .max_age(3600);

    if environment.is_development() {
        // Echo whatever origin calls; a wildcard cannot be combined with
        // credentials.
        return base.allowed_origin_fn(|_origin, _req_head| true);
    }

    match std::env::var("CORS_ALLOWED_ORIGIN") {
        Ok(origin) => base.allowed_origin(&origin),
        Err(_) => base,
    }
}
