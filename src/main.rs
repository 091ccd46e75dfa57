use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use tourism_engine::config::{LoggingSettings, ServerSettings, Settings};
use tourism_engine::core::RecommendationEngine;
use tourism_engine::routes::{self, AppState};

fn init_logging(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.as_str()));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

fn build_cors(server: &ServerSettings) -> Cors {
    if server.allowed_origins.is_empty() {
        return Cors::permissive();
    }

    server
        .allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allow_any_method()
        .allow_any_header()
        .supports_credentials()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&settings.logging);

    info!("Starting Tourism Recommendation Engine...");

    // Load the catalog and model off the async runtime; any failure is fatal
    let data = settings.data.clone();
    let engine = tokio::task::spawn_blocking(move || {
        RecommendationEngine::load(&data.locations_path, &data.model_path)
    })
    .await
    .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    let engine = match engine {
        Ok(engine) => Arc::new(engine),
        Err(e) => {
            error!("Startup failed: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()));
        }
    };

    let stats = engine.stats();
    info!(
        "Engine ready: model loaded = {} ({}), {} locations",
        stats.model_loaded,
        engine.scorer_description(),
        stats.locations_loaded
    );

    let app_state = AppState {
        engine,
        recommendation: settings.recommendation.clone(),
    };

    let server = settings.server.clone();
    let workers = server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", server.host, server.port);

    let bind = (server.host.clone(), server.port);
    HttpServer::new(move || {
        let api_prefix = server.api_prefix.clone();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(routes::handle_json_payload_error))
            .wrap(build_cors(&server))
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(|cfg| routes::configure_routes(cfg, &api_prefix))
    })
    .workers(workers)
    .bind(bind)?
    .run()
    .await?;

    info!("Shutdown complete");
    Ok(())
}
