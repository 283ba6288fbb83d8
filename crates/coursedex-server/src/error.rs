//! HTTP error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use tracing::error;

/// An error rendered as a JSON response.
#[derive(Debug)]
pub enum ApiError {
    /// 400 with an arbitrary JSON body (string, list, or `{"detail": ...}`).
    BadRequest(Value),
    Forbidden,
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl ApiError {
    /// 400 with a `{"detail": message}` body.
    pub fn detail(message: impl Into<String>) -> Self {
        ApiError::BadRequest(json!({ "detail": message.into() }))
    }

    pub fn not_found() -> Self {
        ApiError::NotFound("Not found.".to_string())
    }

    pub fn invalid_page() -> Self {
        ApiError::NotFound("Invalid page.".to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(body) => (StatusCode::BAD_REQUEST, body),
            ApiError::Forbidden => (
                StatusCode::FORBIDDEN,
                json!({ "detail": "Authentication credentials were not provided." }),
            ),
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, json!({ "detail": detail })),
            ApiError::Conflict(detail) => (StatusCode::CONFLICT, json!({ "detail": detail })),
            ApiError::Internal(detail) => {
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "detail": detail }))
            }
        };
        (status, Json(body)).into_response()
    }
}

impl From<coursedex_core::Error> for ApiError {
    fn from(err: coursedex_core::Error) -> Self {
        match err {
            coursedex_core::Error::Query(message) => ApiError::detail(message),
            other => {
                error!("Request failed: {}", other);
                ApiError::Internal(other.to_string())
            }
        }
    }
}

impl From<coursedex_index::query_language::ParseError> for ApiError {
    fn from(err: coursedex_index::query_language::ParseError) -> Self {
        ApiError::detail(format!("Invalid query: {}", err))
    }
}
