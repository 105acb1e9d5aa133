use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

use crate::domains::auth::AuthError;

/// HTTP-level failures. Bodies always carry `success: false`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!(error = %rejection.body_text(), "Rejected request body");
        ApiError::MalformedPayload(rejection.body_text())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation(message) => ApiError::BadRequest(message.to_string()),
            other => ApiError::Internal(anyhow::Error::new(other)),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::BadRequest(_) | ApiError::MalformedPayload(_) => {
                (StatusCode::BAD_REQUEST, Some(self.to_string()))
            }
            ApiError::Unauthenticated => (StatusCode::UNAUTHORIZED, Some(self.to_string())),
            ApiError::Internal(e) => {
                error!(error = %e, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, None)
            }
        };

        (
            status,
            Json(ErrorBody {
                success: false,
                error: message,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err: ApiError = AuthError::Validation("Email is required").into();
        assert!(matches!(err, ApiError::BadRequest(ref m) if m == "Email is required"));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_store_failure_maps_to_internal() {
        let err: ApiError = AuthError::Store(anyhow::anyhow!("connection refused")).into();
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
