use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Per-field validation messages keyed by the form field name.
pub type FieldErrors = BTreeMap<String, String>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),

    #[error("Please fix the errors before submitting")]
    InvalidFields(FieldErrors),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("External service error: {0}")]
    ExternalService(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InvalidFields(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ExternalService(_) => StatusCode::BAD_GATEWAY,
        };

        let body = match self {
            AppError::InvalidFields(fields) => {
                tracing::warn!("Rejected submission with {} invalid field(s)", fields.len());
                json!({
                    "error": "Please fix the errors before submitting",
                    "fields": fields,
                })
            }
            AppError::NotFound(message)
            | AppError::BadRequest(message)
            | AppError::Internal(message)
            | AppError::Conflict(message)
            | AppError::ExternalService(message) => {
                tracing::error!("Error: {}: {}", status, message);
                json!({ "error": message })
            }
        };

        (status, Json(body)).into_response()
    }
}
