//! HTTP error mapping.
//!
//! Every error body has the shape `{"message": "..."}`. Store failures are
//! logged with their cause and surface as a generic `Server error`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Errors returned by HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Server error")]
    Internal(#[source] meetpulse_core::Error),
}

impl From<meetpulse_core::Error> for ApiError {
    fn from(err: meetpulse_core::Error) -> Self {
        match err {
            meetpulse_core::Error::NotFound(msg) => ApiError::NotFound(msg),
            meetpulse_core::Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            other => ApiError::Internal(other),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(ref cause) = self {
            tracing::error!(
                subsystem = "api",
                error = %cause,
                "Request failed"
            );
        }

        let body = Json(serde_json::json!({
            "message": self.to_string(),
        }));

        (self.status(), body).into_response()
    }
}
