use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::error::PlannerError;
use crate::models::trip::TripParameters;
use crate::services::session_store::SessionStore;

/*
    POST /api/sessions
*/
pub async fn create(
    store: web::Data<SessionStore>,
    input: web::Json<TripParameters>,
) -> Result<HttpResponse, PlannerError> {
    let session = store.create(input.into_inner()).await?;
    let snapshot = session.lock().await.snapshot();
    Ok(HttpResponse::Created().json(snapshot))
}

/*
    GET /api/sessions/{id}
*/
pub async fn get(
    store: web::Data<SessionStore>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, PlannerError> {
    let session = store.get(path.into_inner()).await?;
    let snapshot = session.lock().await.snapshot();
    Ok(HttpResponse::Ok().json(snapshot))
}

/*
    DELETE /api/sessions/{id}
*/
pub async fn delete(
    store: web::Data<SessionStore>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, PlannerError> {
    store.remove(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/*
    PUT /api/sessions/{id}/trip
    Replacing the trip discards everything generated for the old one.
*/
pub async fn update_trip(
    store: web::Data<SessionStore>,
    path: web::Path<Uuid>,
    input: web::Json<TripParameters>,
) -> Result<HttpResponse, PlannerError> {
    let session = store.get(path.into_inner()).await?;
    let mut session = session.lock().await;
    session.update_trip(input.into_inner())?;
    Ok(HttpResponse::Ok().json(session.snapshot()))
}

/*
    POST /api/sessions/{id}/reset
*/
pub async fn reset(
    store: web::Data<SessionStore>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, PlannerError> {
    let session = store.get(path.into_inner()).await?;
    let mut session = session.lock().await;
    session.reset();
    Ok(HttpResponse::Ok().json(session.snapshot()))
}
