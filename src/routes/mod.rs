// Route exports
pub mod recommendations;

use actix_web::{error, web, HttpRequest, HttpResponse, Responder};

use crate::error::EngineError;

pub use recommendations::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig, api_prefix: &str) {
    let prefix = api_prefix.to_string();
    cfg.route("/", web::get().to(move || root(prefix.clone())))
        .service(web::scope(api_prefix).configure(recommendations::configure));
}

/// Service banner
async fn root(api_prefix: String) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Tourism Recommendation Engine API",
        "version": env!("CARGO_PKG_VERSION"),
        "health": format!("{}/health", api_prefix),
    }))
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    EngineError::invalid(format!("Invalid JSON: {}", err)).into()
}
