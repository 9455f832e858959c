//! Error responses for the HTTP API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use shelf_registry::RegistryError;
use shelf_types::AppError;

use crate::types::ErrorResponse;

/// Application error that can be converted to an HTTP response.
pub struct ApiErrorResponse {
    pub status: StatusCode,
    pub error: ErrorResponse,
}

impl ApiErrorResponse {
    pub fn new(
        status: StatusCode,
        error_type: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status,
            error: ErrorResponse::new(error_type, message),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid_request_error", message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, "registry_error", message)
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.error = self.error.with_code(code);
        self
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<AppError> for ApiErrorResponse {
    fn from(err: AppError) -> Self {
        match err {
            AppError::InvalidParams(msg) => ApiErrorResponse::bad_request(msg),
            AppError::Config(msg) => {
                ApiErrorResponse::internal_error(format!("Configuration error: {}", msg))
            }
            AppError::Storage(err) => {
                ApiErrorResponse::internal_error(format!("Storage error: {}", err))
            }
            AppError::Io(err) => ApiErrorResponse::internal_error(format!("IO error: {}", err)),
            AppError::Serialization(err) => {
                ApiErrorResponse::internal_error(format!("Serialization error: {}", err))
            }
            AppError::Internal(msg) => ApiErrorResponse::internal_error(msg),
        }
    }
}

impl From<RegistryError> for ApiErrorResponse {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::MissingToken => ApiErrorResponse::bad_request(err.to_string()),
            RegistryError::Upstream { status, .. } => {
                // The upstream body rides along verbatim in the message
                let message = err.to_string();
                ApiErrorResponse::bad_gateway(message).with_code(status.to_string())
            }
            RegistryError::Request(err) => {
                ApiErrorResponse::bad_gateway(format!("Registry request failed: {}", err))
            }
            RegistryError::Storage(err) => err.into(),
        }
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiErrorResponse>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_token_is_bad_request() {
        let response = ApiErrorResponse::from(RegistryError::MissingToken);
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_upstream_failure_keeps_body_and_status() {
        let response = ApiErrorResponse::from(RegistryError::Upstream {
            status: 503,
            body: "overloaded".to_string(),
        });
        assert_eq!(response.status, StatusCode::BAD_GATEWAY);
        assert!(response.error.error.message.contains("overloaded"));
        assert_eq!(response.error.error.code.as_deref(), Some("503"));
    }

    #[test]
    fn test_invalid_params_is_bad_request() {
        let response = ApiErrorResponse::from(AppError::InvalidParams("bad page".to_string()));
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
    }
}
