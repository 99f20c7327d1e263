//! HTTP error response handling for the API
//!
//! This module provides conversions from domain errors to HTTP responses
//! with appropriate status codes and JSON error bodies.

use crate::error::{ApiError, Error, ToHttpStatus};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Implement IntoResponse for Error to automatically convert errors to HTTP responses
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let api_error: ApiError = self.into();

        (status_code, Json(api_error)).into_response()
    }
}

/// Implement IntoResponse for ApiError for explicit error responses
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Default to 500 if we're directly converting an ApiError
        // (usually errors go through Error::into_response which has the status code)
        (StatusCode::INTERNAL_SERVER_ERROR, Json(self)).into_response()
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use crate::error::{Error, ManifestError, ToHttpStatus};
    use crate::types::{JobId, Status};

    #[test]
    fn test_error_to_http_status_not_found() {
        let error = Error::NotFound("test".to_string());
        assert_eq!(error.status_code(), 404);
        assert_eq!(error.error_code(), "not_found");
    }

    #[test]
    fn test_error_to_http_status_validation() {
        let error = Error::Validation {
            message: "source_id must be alphanumeric".to_string(),
            field: Some("source_id".to_string()),
        };
        assert_eq!(error.status_code(), 400);
        assert_eq!(error.error_code(), "validation_error");
    }

    #[test]
    fn test_error_to_http_status_not_ready() {
        let error = Error::NotReady {
            id: JobId::new(1),
            status: Status::Downloading,
        };
        assert_eq!(error.status_code(), 409);
        assert_eq!(error.error_code(), "not_ready");
    }

    #[test]
    fn test_error_to_http_status_bad_gateway() {
        let error = Error::Manifest(ManifestError::Status {
            source_id: "abc".to_string(),
            status: 404,
        });
        assert_eq!(error.status_code(), 502);
    }

    #[test]
    fn test_error_to_http_status_service_unavailable() {
        let error = Error::ShuttingDown;
        assert_eq!(error.status_code(), 503);
        assert_eq!(error.error_code(), "shutting_down");
    }
}
