use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::orchestration::{ErrorKind, OrchestrationError};

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Orchestration(#[from] OrchestrationError),
}

/// HTTP status and stable error code for each orchestration failure kind.
pub fn status_for(kind: ErrorKind) -> (StatusCode, &'static str) {
    match kind {
        ErrorKind::MissingCredential => (StatusCode::UNAUTHORIZED, "MISSING_CREDENTIAL"),
        ErrorKind::RemoteCallFailed => (StatusCode::BAD_GATEWAY, "REMOTE_CALL_FAILED"),
        ErrorKind::SchemaViolation => (StatusCode::BAD_GATEWAY, "SCHEMA_VIOLATION"),
        ErrorKind::SchedulerConflict => {
            (StatusCode::INTERNAL_SERVER_ERROR, "SCHEDULER_CONFLICT")
        }
        ErrorKind::Timeout => (StatusCode::GATEWAY_TIMEOUT, "TIMEOUT"),
        ErrorKind::InvalidRequest => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let AppError::Orchestration(e) = &self;
        let kind = e.kind();
        let (status, code) = status_for(kind);
        if status.is_server_error() {
            tracing::error!("Orchestration error: {e}");
        }
        let message = format!("{} ({e})", kind.user_message());

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
