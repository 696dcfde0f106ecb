//! API error types with IntoResponse
//!
//! Errors are converted to JSON responses with appropriate status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use recipectl_core::{ImportError, ValidationError};

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Recipe body failed validation (422)
    Validation(ValidationError),

    /// Malformed request, e.g. an oversized or non-JSON import (400)
    BadRequest { message: String },

    /// JSON body that does not match the request type (422)
    InvalidBody { message: String },

    /// Import rejected because items failed schema checks (422)
    ImportRejected { errors: Vec<ImportError> },

    /// Resource not found (404)
    NotFound { resource: &'static str, id: String },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn invalid_body(message: impl Into<String>) -> Self {
        Self::InvalidBody {
            message: message.into(),
        }
    }

    pub fn recipe_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: "recipe",
            id: id.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Validation(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({
                    "error": "validation_error",
                    "field": e.field(),
                    "message": e.to_string()
                }),
            ),
            Self::BadRequest { message } => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "bad_request",
                    "message": message
                }),
            ),
            Self::InvalidBody { message } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({
                    "error": "invalid_body",
                    "message": message
                }),
            ),
            Self::ImportRejected { errors } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({
                    "error": "import_rejected",
                    "message": "Recipe schema validation failed",
                    "errors": errors
                }),
            ),
            Self::NotFound { resource, id } => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": "not_found",
                    "message": format!("{} '{}' not found", resource, id)
                }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}
