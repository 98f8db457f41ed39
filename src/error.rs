use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("session {0} not found")]
    SessionNotFound(Uuid),

    #[error("{0}")]
    NotFound(String),

    /// The session is missing something the operation needs, e.g. a trip
    /// that spans at least one night.
    #[error("{0}")]
    NotReady(String),

    #[error("{service} did not respond in time")]
    Timeout { service: &'static str },

    #[error("{service} is unreachable: {message}")]
    Unavailable {
        service: &'static str,
        message: String,
    },

    #[error("{service} request failed: {message}")]
    Service {
        service: &'static str,
        status: Option<u16>,
        message: String,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, PlannerError>;

impl PlannerError {
    pub fn from_reqwest(service: &'static str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return PlannerError::Timeout { service };
        }
        if err.is_connect() || err.is_request() {
            return PlannerError::Unavailable {
                service,
                message: err.to_string(),
            };
        }
        PlannerError::Service {
            service,
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }

    pub fn from_status(service: &'static str, status: reqwest::StatusCode, body: &str) -> Self {
        PlannerError::Service {
            service,
            status: Some(status.as_u16()),
            message: format!("HTTP {}: {}", status.as_u16(), body.trim()),
        }
    }

    /// Timeouts, failed connections, rate limiting and 5xx responses are
    /// worth another attempt. Everything else, including an unreadable body,
    /// is final.
    pub fn is_transient(&self) -> bool {
        match self {
            PlannerError::Timeout { .. } | PlannerError::Unavailable { .. } => true,
            PlannerError::Service {
                status: Some(code), ..
            } => *code == 429 || *code >= 500,
            _ => false,
        }
    }
}

impl ResponseError for PlannerError {
    fn status_code(&self) -> StatusCode {
        match self {
            PlannerError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            PlannerError::SessionNotFound(_) | PlannerError::NotFound(_) => StatusCode::NOT_FOUND,
            PlannerError::NotReady(_) => StatusCode::CONFLICT,
            PlannerError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            PlannerError::Service { .. } | PlannerError::Unavailable { .. } => {
                StatusCode::BAD_GATEWAY
            }
            PlannerError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}
