//! API error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

/// JSON error body
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Human-readable message
    pub error: String,
}

/// Error returned by API handlers
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Map a tracking error, hiding server-side details behind `context`
    pub fn from_tracking(err: convoy_core::Error, context: &str) -> Self {
        use convoy_core::Error;

        match err {
            Error::LinkLimitReached { .. } => {
                Self::new(StatusCode::TOO_MANY_REQUESTS, err.to_string())
            }
            Error::InvalidCoordinates { .. } => Self::new(StatusCode::BAD_REQUEST, err.to_string()),
            other => {
                error!(error = %other, "{}", context);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, context)
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}
