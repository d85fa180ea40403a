use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use jobboard_core::storage::{service_error_to_status_code, ServiceError};

/// Handler error type that wraps `anyhow::Error`.
///
/// `ServiceError`s map to their HTTP status with `{"message": ...}` bodies.
/// Anything else is a 500. Server-side failures never leak their details.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self.0.downcast_ref::<ServiceError>() {
            Some(err) => StatusCode::from_u16(service_error_to_status_code(err))
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            None => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = match status {
            StatusCode::INTERNAL_SERVER_ERROR => {
                tracing::error!(error = %self.0, "Internal error");
                "Internal server error".to_string()
            }
            StatusCode::SERVICE_UNAVAILABLE => {
                tracing::error!(error = %self.0, "Authoritative store unavailable");
                "Service temporarily unavailable".to_string()
            }
            _ => {
                tracing::debug!(status = %status, error = %self.0, "Request rejected");
                self.0.to_string()
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// Maps an extractor rejection (bad JSON body, query or path) to a 400
/// with the usual `{"message": ...}` body.
pub fn rejected(rejection: impl std::fmt::Display) -> AppError {
    tracing::debug!(error = %rejection, "Rejected malformed request");
    ServiceError::Validation(rejection.to_string()).into()
}
