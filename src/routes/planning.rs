use actix_web::http::header::{
    Charset, ContentDisposition, DispositionParam, DispositionType, ExtendedValue,
};
use actix_web::{web, HttpResponse};
use serde::Serialize;
use uuid::Uuid;

use crate::error::PlannerError;
use crate::models::budget::BudgetBreakdown;
use crate::models::schedule::DayEdit;
use crate::models::spot::Spot;
use crate::services::export_service::export_plan;
use crate::services::session_store::SessionStore;
use crate::services::trip_planner_service::TripPlanner;

#[derive(Serialize)]
struct SpotList {
    destination: String,
    spots: Vec<Spot>,
}

/*
    GET /api/sessions/{id}/spots
*/
pub async fn spots(
    planner: web::Data<TripPlanner>,
    store: web::Data<SessionStore>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, PlannerError> {
    let session = store.get(path.into_inner()).await?;
    let mut session = session.lock().await;
    let spots = planner.recommend_spots(&mut session).await?;
    Ok(HttpResponse::Ok().json(SpotList {
        destination: session.trip.destination.clone(),
        spots,
    }))
}

/*
    GET /api/sessions/{id}/spots/map
*/
pub async fn spot_map(
    planner: web::Data<TripPlanner>,
    store: web::Data<SessionStore>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, PlannerError> {
    let session = store.get(path.into_inner()).await?;
    let mut session = session.lock().await;
    let map = planner.locate_spots(&mut session).await?;
    Ok(HttpResponse::Ok().json(map))
}

/*
    POST /api/sessions/{id}/schedule
*/
pub async fn generate_schedule(
    planner: web::Data<TripPlanner>,
    store: web::Data<SessionStore>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, PlannerError> {
    let session = store.get(path.into_inner()).await?;
    let mut session = session.lock().await;
    let schedule = planner.generate_schedule(&mut session).await?;
    Ok(HttpResponse::Ok().json(schedule))
}

/*
    PUT /api/sessions/{id}/schedule/{day}
*/
pub async fn update_day(
    planner: web::Data<TripPlanner>,
    store: web::Data<SessionStore>,
    path: web::Path<(Uuid, u32)>,
    input: web::Json<DayEdit>,
) -> Result<HttpResponse, PlannerError> {
    let (id, day) = path.into_inner();
    let session = store.get(id).await?;
    let mut session = session.lock().await;
    let updated = planner.update_day(&mut session, day, input.into_inner())?;
    Ok(HttpResponse::Ok().json(updated))
}

/*
    POST /api/sessions/{id}/packing
*/
pub async fn generate_packing_list(
    planner: web::Data<TripPlanner>,
    store: web::Data<SessionStore>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, PlannerError> {
    let session = store.get(path.into_inner()).await?;
    let mut session = session.lock().await;
    let list = planner.generate_packing_list(&mut session).await?;
    Ok(HttpResponse::Ok().json(list))
}

/*
    GET /api/sessions/{id}/budget
*/
pub async fn budget(
    planner: web::Data<TripPlanner>,
    store: web::Data<SessionStore>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, PlannerError> {
    let session = store.get(path.into_inner()).await?;
    let session = session.lock().await;
    Ok(HttpResponse::Ok().json(planner.budget_summary(&session)))
}

/*
    PUT /api/sessions/{id}/budget
*/
pub async fn set_budget(
    planner: web::Data<TripPlanner>,
    store: web::Data<SessionStore>,
    path: web::Path<Uuid>,
    input: web::Json<BudgetBreakdown>,
) -> Result<HttpResponse, PlannerError> {
    let session = store.get(path.into_inner()).await?;
    let mut session = session.lock().await;
    let summary = planner.set_budget(&mut session, input.into_inner());
    Ok(HttpResponse::Ok().json(summary))
}

/*
    GET /api/sessions/{id}/export
*/
pub async fn export(
    planner: web::Data<TripPlanner>,
    store: web::Data<SessionStore>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, PlannerError> {
    let session = store.get(path.into_inner()).await?;
    let plan = export_plan(&*session.lock().await, planner.config().language);

    Ok(HttpResponse::Ok()
        .content_type("text/markdown; charset=utf-8")
        .insert_header(attachment(&plan.file_name))
        .body(plan.content))
}

fn attachment(file_name: &str) -> ContentDisposition {
    let mut parameters = vec![DispositionParam::Filename(file_name.to_string())];
    if !file_name.is_ascii() {
        parameters.push(DispositionParam::FilenameExt(ExtendedValue {
            charset: Charset::Ext("UTF-8".to_string()),
            language_tag: None,
            value: file_name.as_bytes().to_vec(),
        }));
    }
    ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters,
    }
}
