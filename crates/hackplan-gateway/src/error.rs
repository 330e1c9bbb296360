//! Subsystem error → HTTP response mapping.
//!
//! Every handler returns `Result<_, ApiError>`; the body is always
//! `{"error": {"code": "...", "message": "..."}}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "AUTH_FAILED", message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, "PERMISSION_DENIED", message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": { "code": self.code, "message": self.message }
        }));
        (self.status, body).into_response()
    }
}

impl From<hackplan_users::UserError> for ApiError {
    fn from(e: hackplan_users::UserError) -> Self {
        use hackplan_users::UserError as E;
        match &e {
            E::NotFound(_) => Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", e.to_string()),
            E::EmailTaken(_) => Self::new(StatusCode::CONFLICT, "EMAIL_TAKEN", e.to_string()),
            E::InvalidCredentials => {
                Self::new(StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS", e.to_string())
            }
            E::InvalidToken(_) | E::TokenExpired => Self::unauthorized(e.to_string()),
            E::Hashing(_) | E::Database(_) => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", e.to_string())
            }
        }
    }
}

impl From<hackplan_events::EventError> for ApiError {
    fn from(e: hackplan_events::EventError) -> Self {
        use hackplan_events::EventError as E;
        match &e {
            E::HackathonNotFound(_) | E::MemberNotFound(_) => {
                Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", e.to_string())
            }
            E::Validation(_) => Self::bad_request(e.to_string()),
            E::Database(_) => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR", e.to_string())
            }
        }
    }
}

impl From<hackplan_tasks::TaskError> for ApiError {
    fn from(e: hackplan_tasks::TaskError) -> Self {
        use hackplan_tasks::TaskError as E;
        match &e {
            E::NotFound(_) => Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", e.to_string()),
            E::Validation(_) | E::SelfDependency(_) => Self::bad_request(e.to_string()),
            E::DuplicateDependency { .. } => {
                Self::new(StatusCode::CONFLICT, "DUPLICATE_DEPENDENCY", e.to_string())
            }
            E::DependencyCycle { .. } => {
                Self::new(StatusCode::CONFLICT, "DEPENDENCY_CYCLE", e.to_string())
            }
            E::Database(_) => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR", e.to_string())
            }
        }
    }
}

impl From<hackplan_scheduler::ScheduleError> for ApiError {
    fn from(e: hackplan_scheduler::ScheduleError) -> Self {
        use hackplan_scheduler::ScheduleError as E;
        match &e {
            E::DependencyCycle { .. } => {
                Self::new(StatusCode::CONFLICT, "DEPENDENCY_CYCLE", e.to_string())
            }
            E::UnknownTask { .. } | E::InvalidSlot { .. } => {
                Self::new(StatusCode::UNPROCESSABLE_ENTITY, "BAD_SCHEDULE_INPUT", e.to_string())
            }
        }
    }
}

impl From<hackplan_llm::ProviderError> for ApiError {
    fn from(e: hackplan_llm::ProviderError) -> Self {
        use hackplan_llm::ProviderError as E;
        match &e {
            E::RateLimited { .. } => {
                Self::new(StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED", e.to_string())
            }
            E::Unavailable(_) => {
                Self::new(StatusCode::SERVICE_UNAVAILABLE, "PROVIDER_UNAVAILABLE", e.to_string())
            }
            E::Api { status, .. } => Self::new(
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
                "PROVIDER_ERROR",
                e.to_string(),
            ),
            E::Http(_) | E::Parse(_) => {
                Self::new(StatusCode::BAD_GATEWAY, "PROVIDER_ERROR", e.to_string())
            }
        }
    }
}
