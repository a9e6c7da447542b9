use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use storefront_core::DomainError;
use storefront_shared::constants::MESSAGE_INVALID_DATA;
use thiserror::Error;

use crate::response::ApiResponse;

/// Handler error. Detail stays in the server log; clients get a fixed message.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidInput(msg) => Self::InvalidInput(msg),
            DomainError::StoreUnavailable(msg) => Self::ServiceUnavailable(msg),
            DomainError::StorageError(msg) => Self::InternalError(msg),
            DomainError::SerializationError(e) => Self::InternalError(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidInput(msg) => {
                tracing::warn!("Invalid input: {}", msg);
                (StatusCode::BAD_REQUEST, MESSAGE_INVALID_DATA)
            }
            ApiError::ServiceUnavailable(msg) => {
                tracing::error!("Service unavailable: {}", msg);
                (StatusCode::SERVICE_UNAVAILABLE, "Service unavailable")
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (status, Json(ApiResponse::error(message))).into_response()
    }
}
