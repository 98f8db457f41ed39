use actix_web::web;

use crate::error::PlannerError;

pub mod chat;
pub mod destination;
pub mod health;
pub mod planning;
pub mod sessions;

pub fn config(cfg: &mut web::ServiceConfig) {
    // Extractor failures get the same JSON error body as handler errors.
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _| {
        PlannerError::InvalidInput(err.to_string()).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _| {
        PlannerError::InvalidInput(err.to_string()).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _| {
        PlannerError::NotFound(err.to_string()).into()
    }));

    cfg.route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api/sessions")
                .route("", web::post().to(sessions::create))
                .service(
                    web::scope("/{id}")
                        .route("", web::get().to(sessions::get))
                        .route("", web::delete().to(sessions::delete))
                        .route("/trip", web::put().to(sessions::update_trip))
                        .route("/reset", web::post().to(sessions::reset))
                        .route("/spots", web::get().to(planning::spots))
                        .route("/spots/map", web::get().to(planning::spot_map))
                        .route("/schedule", web::post().to(planning::generate_schedule))
                        .route("/schedule/{day}", web::put().to(planning::update_day))
                        .route("/packing", web::post().to(planning::generate_packing_list))
                        .route("/budget", web::get().to(planning::budget))
                        .route("/budget", web::put().to(planning::set_budget))
                        .route("/export", web::get().to(planning::export))
                        .route("/weather", web::get().to(destination::weather))
                        .route("/images", web::get().to(destination::images))
                        .route("/chat", web::get().to(chat::history))
                        .route("/chat", web::post().to(chat::send))
                        .route("/chat/stream", web::post().to(chat::stream)),
                ),
        );
}
