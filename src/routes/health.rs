use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use std::collections::HashMap;
use std::env;

use crate::services::session_store::SessionStore;
use crate::services::trip_planner_service::TripPlanner;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    sessions: usize,
    environment: String,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

pub async fn health_check(
    planner: web::Data<TripPlanner>,
    store: web::Data<SessionStore>,
) -> impl Responder {
    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: HashMap::new(),
        sessions: store.len().await,
        environment: env::var("RUST_ENV").unwrap_or("development".to_string()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let llm_result = check_llm(&planner);
    health.services.insert("llm".to_string(), llm_result.clone());

    let images_result = check_image_search(&planner);
    health
        .services
        .insert("image_search".to_string(), images_result.clone());

    // Geocoding and weather need no credentials, so a missing key can only
    // degrade the two services above.
    if llm_result.status != "ok" || images_result.status != "ok" {
        health.status = "degraded".to_string();
    }

    HttpResponse::Ok().json(health)
}

fn check_llm(planner: &TripPlanner) -> ServiceStatus {
    if planner.llm().is_configured() {
        ServiceStatus {
            status: "ok".to_string(),
            details: Some(format!("API key configured, model {}", planner.llm().model())),
        }
    } else {
        ServiceStatus {
            status: "error".to_string(),
            details: Some("OPENAI_API_KEY not configured".to_string()),
        }
    }
}

fn check_image_search(planner: &TripPlanner) -> ServiceStatus {
    if planner.images().is_configured() {
        ServiceStatus {
            status: "ok".to_string(),
            details: Some("Access key configured".to_string()),
        }
    } else {
        ServiceStatus {
            status: "error".to_string(),
            details: Some("IMAGE_SEARCH_ACCESS_KEY not configured".to_string()),
        }
    }
}
