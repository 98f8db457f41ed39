use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use log::{error, info, warn};

use trip_planner_api::config::AppConfig;
use trip_planner_api::routes;
use trip_planner_api::services::session_store::SessionStore;
use trip_planner_api::services::trip_planner_service::TripPlanner;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    env_logger::init_from_env(Env::default().default_filter_or("info"));
    info!("Application starting...");

    let config = AppConfig::from_env().map_err(|e| {
        error!("Invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    if config.llm.api_key.is_none() {
        warn!("OPENAI_API_KEY is not set; generation and chat requests will fail");
    }

    let planner = TripPlanner::new(&config).map_err(|e| {
        error!("Failed to initialise services: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;
    let planner = web::Data::new(planner);
    let store = web::Data::new(SessionStore::with_idle_ttl(config.sessions.idle_ttl));

    let (host, port) = (config.server.host.clone(), config.server.port);
    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .app_data(planner.clone())
            .app_data(store.clone())
            .configure(routes::config)
    })
    .bind((host, port))?
    .run()
    .await
}
