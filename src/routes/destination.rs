use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::error::PlannerError;
use crate::services::session_store::SessionStore;
use crate::services::trip_planner_service::TripPlanner;

#[derive(serde::Deserialize)]
pub struct ImageQuery {
    count: Option<u32>,
}

/*
    GET /api/sessions/{id}/weather
*/
pub async fn weather(
    planner: web::Data<TripPlanner>,
    store: web::Data<SessionStore>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, PlannerError> {
    let session = store.get(path.into_inner()).await?;
    let mut session = session.lock().await;
    let forecast = planner.forecast(&mut session).await?;
    Ok(HttpResponse::Ok().json(forecast))
}

/*
    GET /api/sessions/{id}/images?count=3
*/
pub async fn images(
    planner: web::Data<TripPlanner>,
    store: web::Data<SessionStore>,
    path: web::Path<Uuid>,
    params: web::Query<ImageQuery>,
) -> Result<HttpResponse, PlannerError> {
    let session = store.get(path.into_inner()).await?;
    let mut session = session.lock().await;
    let images = planner.destination_images(&mut session, params.count).await?;
    Ok(HttpResponse::Ok().json(images))
}
