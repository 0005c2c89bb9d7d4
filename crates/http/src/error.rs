//! Centralized error-to-response mapping for the HTTP layer.
//!
//! Handlers never serialize errors themselves; every failure is forwarded
//! here and rendered into the uniform `{success: false, error: {...}}`
//! envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

/// Error payload nested inside the failure envelope
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Application error types that map to HTTP responses
#[derive(Error, Debug)]
pub enum AppError {
    /// Caller-correctable fault: missing or invalid input, absent record,
    /// or a write that reported no effect. Always maps to 400.
    #[error("{message}")]
    Validation { message: String },

    /// Operational error carrying an explicit status
    #[error("{message}")]
    Status {
        status: StatusCode,
        message: String,
    },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create an operational error with an explicit status code
    pub fn with_status(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::Internal(anyhow::Error::new(err))
    }
}

/// Render a failure envelope with the given status
pub fn error_response(status: StatusCode, body: ErrorBody) -> Response {
    (status, Json(json!({ "success": false, "error": body }))).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4();

        let (status, message, detail) = match self {
            AppError::Validation { message } => (StatusCode::BAD_REQUEST, message, None),
            AppError::Status { status, message } => (status, message, None),
            AppError::Internal(err) => {
                // Hide internals outside development builds.
                let detail = if cfg!(debug_assertions) {
                    Some(format!("{err:#}"))
                } else {
                    None
                };
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                    detail,
                )
            }
        };

        tracing::error!(
            error_id = %error_id,
            status_code = status.as_u16(),
            message = %message,
            "request failed"
        );

        error_response(
            status,
            ErrorBody {
                message,
                code: None,
                detail,
            },
        )
    }
}
