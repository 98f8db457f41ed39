use actix_web::{web, web::Bytes, HttpResponse};
use futures::StreamExt;
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::error::PlannerError;
use crate::models::conversation::ConversationMessage;
use crate::services::session_store::SessionStore;
use crate::services::trip_planner_service::TripPlanner;

#[derive(Deserialize)]
pub struct ChatInput {
    message: String,
}

#[derive(Serialize)]
struct ChatHistory {
    messages: Vec<ConversationMessage>,
}

#[derive(Serialize)]
struct ChatReply {
    reply: String,
    messages: Vec<ConversationMessage>,
}

/*
    GET /api/sessions/{id}/chat
*/
pub async fn history(
    store: web::Data<SessionStore>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, PlannerError> {
    let session = store.get(path.into_inner()).await?;
    let messages = session.lock().await.conversation.visible();
    Ok(HttpResponse::Ok().json(ChatHistory { messages }))
}

/*
    POST /api/sessions/{id}/chat
*/
pub async fn send(
    planner: web::Data<TripPlanner>,
    store: web::Data<SessionStore>,
    path: web::Path<Uuid>,
    input: web::Json<ChatInput>,
) -> Result<HttpResponse, PlannerError> {
    let session = store.get(path.into_inner()).await?;
    let mut session = session.lock().await;
    let reply = planner.chat(&mut session, &input.message).await?;
    Ok(HttpResponse::Ok().json(ChatReply {
        reply,
        messages: session.conversation.visible(),
    }))
}

/*
    POST /api/sessions/{id}/chat/stream

    Server-sent events: one `data: {"content": ...}` event per fragment, an
    `error` event if the upstream fails mid-reply, then `data: [DONE]`.
    Failures before the first fragment are ordinary JSON errors.
*/
pub async fn stream(
    planner: web::Data<TripPlanner>,
    store: web::Data<SessionStore>,
    path: web::Path<Uuid>,
    input: web::Json<ChatInput>,
) -> Result<HttpResponse, PlannerError> {
    let session = store.get(path.into_inner()).await?;
    let guard = session.lock_owned().await;
    let mut fragments = planner.chat_stream(guard, &input.message).await?;

    let body = async_stream::stream! {
        while let Some(fragment) = fragments.next().await {
            match fragment {
                Ok(content) => {
                    yield Ok::<_, actix_web::Error>(event(&json!({ "content": content })));
                }
                Err(e) => {
                    warn!("Chat stream failed: {}", e);
                    let payload = json!({ "error": e.to_string() });
                    yield Ok(Bytes::from(format!("event: error\ndata: {}\n\n", payload)));
                    return;
                }
            }
        }
        yield Ok(Bytes::from_static(b"data: [DONE]\n\n"));
    };

    Ok(HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header(("Cache-Control", "no-cache"))
        .streaming(body))
}

fn event(payload: &serde_json::Value) -> Bytes {
    Bytes::from(format!("data: {}\n\n", payload))
}
