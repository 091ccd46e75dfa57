use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::config::RecommendationSettings;
use crate::core::RecommendationEngine;
use crate::error::EngineError;
use crate::models::{
    HealthResponse, PredictRequest, PredictionResponse, RecommendRequest, RecommendationsResponse,
};

/// Application state shared across all handlers
///
/// Built once at startup; everything inside is read-only.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RecommendationEngine>,
    pub recommendation: RecommendationSettings,
}

/// Configure all recommendation routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/predict", web::post().to(predict))
        .route("/recommend", web::post().to(recommend));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let stats = state.engine.stats();
    let status = if stats.is_ready { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model_loaded: stats.model_loaded,
        locations_loaded: stats.locations_loaded,
    })
}

/// Predict enjoyment score endpoint
///
/// POST /api/v1/predict
///
/// Request body:
/// ```json
/// {
///   "user_profile": {"u_hist": 0.9, "u_adv": 0.4, "u_nat": 0.6, "u_rel": 0.2},
///   "location_name": "Sigiriya Rock Fortress"
/// }
/// ```
async fn predict(
    state: web::Data<AppState>,
    req: web::Json<PredictRequest>,
) -> Result<HttpResponse, EngineError> {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for predict request: {}", errors);
        return Err(EngineError::invalid(errors.to_string()));
    }

    let prediction = state
        .engine
        .predict(&req.user_profile, &req.location_name)
        .inspect_err(|e| tracing::info!("Predict for '{}' failed: {}", req.location_name, e))?;

    tracing::info!(
        "Predicted {:.2} ({}) for {}",
        prediction.score,
        prediction.level,
        prediction.location.name
    );

    Ok(HttpResponse::Ok().json(PredictionResponse::from(prediction)))
}

/// Location recommendations endpoint
///
/// POST /api/v1/recommend
///
/// Request body (either `target_location` or both GPS coordinates):
/// ```json
/// {
///   "user_profile": {"u_hist": 0.9, "u_adv": 0.4, "u_nat": 0.6, "u_rel": 0.2},
///   "target_location": "Colombo",
///   "max_distance_km": 50.0,
///   "top_n": 5
/// }
/// ```
async fn recommend(
    state: web::Data<AppState>,
    req: web::Json<RecommendRequest>,
) -> Result<HttpResponse, EngineError> {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for recommend request: {}", errors);
        return Err(EngineError::invalid(errors.to_string()));
    }

    let origin = req.origin()?;
    let max_distance_km = req
        .max_distance_km
        .unwrap_or(state.recommendation.default_max_distance_km);
    let top_n = req.top_n.unwrap_or(state.recommendation.default_top_n);

    tracing::info!(
        "Recommending top {} within {} km of {:?}",
        top_n,
        max_distance_km,
        origin
    );

    let result = state
        .engine
        .recommend(&req.user_profile, &origin, max_distance_km, top_n)
        .inspect_err(|e| tracing::info!("Recommend failed: {}", e))?;

    tracing::info!(
        "Returning {} recommendations (from {} candidates)",
        result.items.len(),
        result.total_candidates
    );

    Ok(HttpResponse::Ok().json(RecommendationsResponse::new(
        result,
        max_distance_km,
        req.user_profile,
    )))
}
