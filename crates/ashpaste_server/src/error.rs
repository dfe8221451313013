//! HTTP error mapping for API handlers.

use crate::AppError;
use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Errors returned from handlers.
///
/// Caller mistakes are reported verbatim; storage and connection details are
/// logged and replaced with a generic message.
#[derive(Debug)]
pub enum HttpError {
    App(AppError),
    /// A request body or query string that could not be decoded.
    Rejected { status: StatusCode, message: String },
}

impl From<AppError> for HttpError {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        Self::rejected(rejection.status(), rejection.body_text())
    }
}

impl From<QueryRejection> for HttpError {
    fn from(rejection: QueryRejection) -> Self {
        Self::rejected(rejection.status(), rejection.body_text())
    }
}

impl HttpError {
    // Oversized bodies keep 413; every other decode failure is a 400.
    fn rejected(status: StatusCode, message: String) -> Self {
        let status = if status == StatusCode::PAYLOAD_TOO_LARGE {
            status
        } else {
            StatusCode::BAD_REQUEST
        };
        Self::Rejected { status, message }
    }

    /// Status code for the error.
    pub fn status(&self) -> StatusCode {
        let err = match self {
            Self::App(err) => err,
            Self::Rejected { status, .. } => return *status,
        };
        match err {
            AppError::InvalidInput(_) | AppError::InvalidId => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Gone => StatusCode::GONE,
            AppError::HealthCheck(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        let err = match self {
            Self::App(err) => err,
            Self::Rejected { message, .. } => {
                return (status, Json(json!({ "error": message }))).into_response();
            }
        };
        let message = match &err {
            AppError::InvalidInput(_)
            | AppError::InvalidId
            | AppError::NotFound
            | AppError::Gone => err.to_string(),
            AppError::HealthCheck(err) => {
                tracing::error!("Health check failed: {}", err);
                "Storage unavailable".to_string()
            }
            err if err.is_storage_failure() => {
                tracing::error!("Storage error: {}", err);
                "Storage error".to_string()
            }
            err => {
                tracing::error!("Internal error: {:?}", err);
                "Internal server error".to_string()
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
