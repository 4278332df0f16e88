//! HTTP error mapping
//!
//! Every failure becomes a status code plus a `{ "message": ... }` body.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use timer_sounds_core::StoreError;
use timer_sounds_types::{MessageResponse, messages};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("invalid upload: {0}")]
    BadRequest(String),

    #[error("too many files in one upload (max {max})")]
    TooManyFiles { max: usize },
}

impl ApiError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::Store(StoreError::NotFound { .. }) => {
                (StatusCode::NOT_FOUND, messages::NOT_FOUND.to_string())
            }
            ApiError::Store(StoreError::Empty) => {
                (StatusCode::NOT_FOUND, messages::NO_SOUNDS.to_string())
            }
            ApiError::Store(StoreError::Storage { op: "delete", .. }) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                messages::DELETE_FAILED.to_string(),
            ),
            ApiError::Store(StoreError::Storage { .. }) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                messages::STORAGE_FAILED.to_string(),
            ),
            ApiError::BadRequest(_) | ApiError::TooManyFiles { .. } => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        if status.is_server_error() {
            let source = std::error::Error::source(&self)
                .map(ToString::to_string)
                .unwrap_or_default();
            tracing::error!(error = %self, %source, "request failed");
        } else {
            tracing::debug!(error = %self, %status, "request rejected");
        }

        (status, Json(MessageResponse::new(message))).into_response()
    }
}
