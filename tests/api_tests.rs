// HTTP route tests for Tourism Engine

use actix_web::{http::StatusCode, test, web, App};
use serde_json::{json, Value};
use std::sync::Arc;

use tourism_engine::config::RecommendationSettings;
use tourism_engine::core::RecommendationEngine;
use tourism_engine::routes::{self, AppState};

fn app_state() -> AppState {
    let root = env!("CARGO_MANIFEST_DIR");
    let engine = RecommendationEngine::load(
        format!("{}/data/locations_metadata.csv", root),
        format!("{}/tests/fixtures/enjoyment_model.json", root),
    )
    .expect("fixture data should load");

    AppState {
        engine: Arc::new(engine),
        recommendation: RecommendationSettings::default(),
    }
}

macro_rules! service {
    () => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(app_state()))
                .app_data(web::JsonConfig::default().error_handler(routes::handle_json_payload_error))
                .configure(|cfg| routes::configure_routes(cfg, "/api/v1")),
        )
        .await
    };
}

fn profile() -> Value {
    json!({"u_hist": 0.9, "u_adv": 0.4, "u_nat": 0.6, "u_rel": 0.2})
}

#[actix_web::test]
async fn test_health() {
    let app = service!();
    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["model_loaded"], true);
    assert_eq!(body["locations_loaded"], 81);
}

#[actix_web::test]
async fn test_root_banner() {
    let app = service!();
    let req = test::TestRequest::get().uri("/").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["health"], "/api/v1/health");
}

#[actix_web::test]
async fn test_predict() {
    let app = service!();
    let req = test::TestRequest::post()
        .uri("/api/v1/predict")
        .set_json(json!({"user_profile": profile(), "location_name": " Sigiriya Rock Fortress "}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["location_name"], "Sigiriya Rock Fortress");
    assert_eq!(body["predicted_score"], 8.0);
    assert_eq!(body["recommendation_level"], "HIGHLY RECOMMENDED");
    assert_eq!(
        body["location_attributes"],
        json!({
            "l_hist": 1.0, "l_adv": 0.4, "l_nat": 0.5, "l_rel": 0.1,
            "l_outdoor": 1.0, "l_lat": 7.957, "l_lng": 80.7603
        })
    );
}

#[actix_web::test]
async fn test_predict_unknown_location_is_404() {
    let app = service!();
    let req = test::TestRequest::post()
        .uri("/api/v1/predict")
        .set_json(json!({"user_profile": profile(), "location_name": "Atlantis"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "not_found");
    assert_eq!(body["status_code"], 404);
}

#[actix_web::test]
async fn test_predict_out_of_range_profile_is_400() {
    let app = service!();
    let req = test::TestRequest::post()
        .uri("/api/v1/predict")
        .set_json(json!({
            "user_profile": {"u_hist": 1.9, "u_adv": 0.4, "u_nat": 0.6, "u_rel": 0.2},
            "location_name": "Galle Fort"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_recommend_by_target_location() {
    let app = service!();
    let req = test::TestRequest::post()
        .uri("/api/v1/recommend")
        .set_json(json!({
            "user_profile": profile(),
            "target_location": "Colombo",
            "max_distance_km": 50.0,
            "top_n": 5
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["search_origin"],
        json!({"type": "location", "name": "Colombo", "lat": 6.9271, "lng": 79.8612})
    );
    assert_eq!(body["total_candidates"], 10);
    assert_eq!(body["max_distance_km"], 50.0);
    assert_eq!(body["user_profile"], profile());

    let recs = body["recommendations"].as_array().unwrap();
    assert_eq!(recs.len(), 5);
    assert_eq!(recs[0]["rank"], 1);
    assert_eq!(recs[0]["location_name"], "Gangaramaya Temple");
    assert_eq!(recs[0]["recommendation_level"], "HIGHLY RECOMMENDED");
    assert_eq!(recs[0]["latitude"], 6.9169);
    assert_eq!(
        recs[0]["highlights"],
        json!({"historical": 0.8, "adventure": 0.0, "nature": 0.1, "religious": 0.5, "outdoor": 0.0})
    );
    assert_eq!(recs[4]["rank"], 5);
    assert!(recs.iter().all(|r| r["distance_km"].as_f64().unwrap() <= 50.0));
}

#[actix_web::test]
async fn test_recommend_by_gps_uses_defaults() {
    let app = service!();
    let req = test::TestRequest::post()
        .uri("/api/v1/recommend")
        .set_json(json!({
            "user_profile": profile(),
            "current_lat": 6.9271,
            "current_lng": 79.8612
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["search_origin"], json!({"type": "gps", "lat": 6.9271, "lng": 79.8612}));
    assert_eq!(body["max_distance_km"], 50.0);
    assert_eq!(body["recommendations"].as_array().unwrap().len(), 5);
}

#[actix_web::test]
async fn test_recommend_without_origin_is_400() {
    let app = service!();
    let req = test::TestRequest::post()
        .uri("/api/v1/recommend")
        .set_json(json!({"user_profile": profile(), "max_distance_km": 50.0, "top_n": 5}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_request");
}

#[actix_web::test]
async fn test_recommend_with_both_origins_is_400() {
    let app = service!();
    let req = test::TestRequest::post()
        .uri("/api/v1/recommend")
        .set_json(json!({
            "user_profile": profile(),
            "target_location": "Colombo",
            "current_lat": 6.9271,
            "current_lng": 79.8612
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_recommend_unknown_target_is_404() {
    let app = service!();
    let req = test::TestRequest::post()
        .uri("/api/v1/recommend")
        .set_json(json!({"user_profile": profile(), "target_location": "Atlantis"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_recommend_negative_radius_is_400() {
    let app = service!();
    let req = test::TestRequest::post()
        .uri("/api/v1/recommend")
        .set_json(json!({"user_profile": profile(), "target_location": "Colombo", "max_distance_km": -5.0}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_malformed_json_is_400() {
    let app = service!();
    let req = test::TestRequest::post()
        .uri("/api/v1/predict")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"user_profile\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status_code"], 400);
}
