//! API error types with HTTP response mapping.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use checkout::{ManualChannelError, SubmissionError, ValidationError};

/// API-level error type that maps to HTTP responses.
///
/// Every variant renders as `{"success": false, "error": ...}`.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed request body.
    BadRequest(String),
    /// Order request failed validation.
    Validation(ValidationError),
    /// Manual order could not be formatted.
    ManualChannel(ManualChannelError),
    /// The order store rejected the order. Details are logged, not returned.
    Persistence(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, fields) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, Vec::new()),
            ApiError::Validation(err) => {
                (StatusCode::BAD_REQUEST, err.to_string(), err.fields().to_vec())
            }
            ApiError::ManualChannel(err) => (StatusCode::BAD_REQUEST, err.to_string(), Vec::new()),
            ApiError::Persistence(detail) => {
                tracing::error!(error = %detail, "order was not placed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Could not place order".to_string(),
                    Vec::new(),
                )
            }
        };

        let mut body = serde_json::json!({ "success": false, "error": message });
        if !fields.is_empty() {
            body["fields"] = serde_json::json!(fields);
        }
        (status, axum::Json(body)).into_response()
    }
}

impl From<SubmissionError> for ApiError {
    fn from(err: SubmissionError) -> Self {
        match err {
            SubmissionError::Validation(e) => ApiError::Validation(e),
            SubmissionError::Persistence(e) => ApiError::Persistence(e.to_string()),
        }
    }
}

impl From<ManualChannelError> for ApiError {
    fn from(err: ManualChannelError) -> Self {
        ApiError::ManualChannel(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
