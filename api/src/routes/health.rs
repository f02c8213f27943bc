//! Health check endpoint

use actix_web::HttpResponse;
use serde_json::json;

use cl_shared::Envelope;

/// Handler for GET /health
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(Envelope::success(
        "up",
        json!({
            "service": "craftlink-api",
            "version": env!("CARGO_PKG_VERSION"),
        }),
    ))
}
