use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::ErrorBody;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

/// Error response rendered as `{"error": message}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Map a service failure for `route`. Not-found and validation messages
    /// reach the client; anything else is logged and answered with `failure`.
    pub fn from_service(err: ServiceError, route: &'static str, failure: &'static str) -> Self {
        match err {
            ServiceError::NotFound(msg) => Self::new(StatusCode::NOT_FOUND, msg),
            ServiceError::Validation(msg) => Self::bad_request(msg),
            other => {
                error!(%route, error = %other, "request failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, failure)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("storage setup failed: {0}")]
    Storage(#[from] ServiceError),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
