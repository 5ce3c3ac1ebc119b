//! Application error types and Axum response conversion.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use triage_core::TriageError;

/// Application-level errors with HTTP status code mapping.
#[derive(Debug)]
pub enum AppError {
    /// The payload was received but its contents are unusable.
    BadRequest(String),
    /// The request body could not be extracted at all.
    Rejected(StatusCode, String),
}

impl From<TriageError> for AppError {
    fn from(e: TriageError) -> Self {
        AppError::BadRequest(e.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::Rejected(e.status(), e.body_text())
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::Rejected(status, message) => (status, message),
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
