// HTTP API Error Types
use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::services::ServiceError;

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),

    // 404 Not Found
    NotFound(String),

    // 413 Payload Too Large
    PayloadTooLarge(String),

    // 415 Unsupported Media Type
    UnsupportedMediaType(String),

    // 500 Internal Server Error
    InternalServerError(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::PayloadTooLarge(msg) => msg,
            ApiError::UnsupportedMediaType(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }
}

// Body rejections keep their status class; everything malformed is a 400
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let message = rejection.body_text();
        match rejection.status() {
            StatusCode::PAYLOAD_TOO_LARGE => ApiError::PayloadTooLarge(message),
            StatusCode::UNSUPPORTED_MEDIA_TYPE => ApiError::UnsupportedMediaType(message),
            _ => ApiError::bad_request(format!("Malformed request body: {message}")),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(msg) => ApiError::not_found(msg),
            ServiceError::Repository(repo_err) => {
                // Log the real error but return generic message
                tracing::error!("Repository error: {}", repo_err);
                ApiError::internal_server_error("Internal Server Error")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

/// Uniform error body: `{timestamp, status, error, path}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub timestamp: String,
    pub status: u16,
    pub error: String,
    pub path: String,
}

impl ErrorEnvelope {
    pub fn new(status: StatusCode, error: impl Into<String>, path: impl Into<String>) -> Self {
        Self::at(Utc::now(), status, error, path)
    }

    pub fn at(
        now: DateTime<Utc>,
        status: StatusCode,
        error: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: format_timestamp(now),
            status: status.as_u16(),
            error: error.into(),
            path: path.into(),
        }
    }
}

/// ISO-8601 UTC with millisecond precision, e.g. `2024-05-01T12:30:45.123Z`.
pub fn format_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Marker left on error responses so `normalize_errors` can add the request path.
#[derive(Debug, Clone)]
pub struct RaisedError {
    pub message: String,
}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.message().to_string();

        // Path is unknown here; the middleware rewrites the body with it
        let mut response = (status, Json(ErrorEnvelope::new(status, message.clone(), ""))).into_response();
        response.extensions_mut().insert(RaisedError { message });
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::RepositoryError;
    use chrono::TimeZone;

    #[test]
    fn maps_service_errors() {
        let not_found: ApiError = ServiceError::product_not_found().into();
        assert_eq!(not_found, ApiError::not_found("Product not found"));
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);

        let storage: ApiError = ServiceError::Repository(RepositoryError::Custom("boom".into())).into();
        assert_eq!(storage.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!storage.message().contains("boom"));
    }

    #[test]
    fn formats_timestamp_with_millis() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 45).unwrap()
            + chrono::Duration::milliseconds(7);
        assert_eq!(format_timestamp(now), "2024-05-01T12:30:45.007Z");
    }

    #[test]
    fn envelope_has_four_fields() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let envelope = ErrorEnvelope::at(now, StatusCode::NOT_FOUND, "Product not found", "/api/v1/products/x");
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "timestamp": "2024-05-01T00:00:00.000Z",
                "status": 404,
                "error": "Product not found",
                "path": "/api/v1/products/x"
            })
        );
    }

    #[test]
    fn response_carries_marker() {
        let response = ApiError::bad_request("bad").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let raised = response.extensions().get::<RaisedError>().unwrap();
        assert_eq!(raised.message, "bad");
    }
}
