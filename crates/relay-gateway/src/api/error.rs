//! API error types and responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use relay_bridge::BridgeError;

/// API error type
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Bridge(#[from] BridgeError),
}

/// API error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    pub retryable: bool,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, retryable) = match &self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", false),
            ApiError::Bridge(err) => match err {
                BridgeError::CredentialUnavailable(_) => {
                    (StatusCode::BAD_GATEWAY, "CREDENTIAL_UNAVAILABLE", false)
                }
                BridgeError::ClientInitializationFailed(_) => (
                    StatusCode::BAD_GATEWAY,
                    "CLIENT_INITIALIZATION_FAILED",
                    false,
                ),
                BridgeError::FunctionNotFound { .. } => {
                    (StatusCode::NOT_FOUND, "FUNCTION_NOT_FOUND", false)
                }
                BridgeError::LocatorUnavailable(_) => {
                    (StatusCode::SERVICE_UNAVAILABLE, "LOCATOR_UNAVAILABLE", true)
                }
                BridgeError::RemoteInvocationFailed(_) => {
                    (StatusCode::BAD_GATEWAY, "REMOTE_INVOCATION_FAILED", false)
                }
                BridgeError::UnsupportedIntegrationPattern(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "UNSUPPORTED_INTEGRATION_PATTERN",
                    false,
                ),
            },
        };

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
            retryable,
        };

        (status, Json(body)).into_response()
    }
}
