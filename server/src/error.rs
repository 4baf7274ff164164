//! Maps dashboard errors to JSON responses.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use docdesk::forms::FieldErrors;
use docdesk::ActionError;

#[derive(Error, Debug)]
pub enum AppError {
    /// One or more form fields were rejected.
    #[error("{message}")]
    Validation {
        message: String,
        errors: FieldErrors,
    },

    #[error("{0}")]
    NotFound(String),

    /// A failed update. The message is safe to show and is sent as is.
    #[error("{message}")]
    Database { message: String },

    /// The request body could not be read as a form.
    #[error("{message}")]
    BadRequest { status: StatusCode, message: String },

    /// Details are logged where the error is created, never sent.
    #[error("internal error")]
    Internal,
}

impl From<ActionError> for AppError {
    fn from(err: ActionError) -> Self {
        match err {
            ActionError::Invalid { errors, message } => AppError::Validation { message, errors },
            ActionError::NotFound { .. } => AppError::NotFound(err.to_string()),
            ActionError::UpdateFailed { message, source } => {
                tracing::error!(error = %source, "{}", message);
                AppError::Database { message }
            }
            other => {
                tracing::error!(error = %other, source = ?std::error::Error::source(&other), "Action failed");
                AppError::Internal
            }
        }
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::BadRequest {
            status: err.status(),
            message: err.body_text(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation { message, errors } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(serde_json::json!({ "message": message, "errors": errors })),
            )
                .into_response(),
            AppError::NotFound(message) => (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({ "message": message })),
            )
                .into_response(),
            AppError::Database { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "message": message })),
            )
                .into_response(),
            AppError::BadRequest { status, message } => {
                (status, Json(serde_json::json!({ "message": message }))).into_response()
            }
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "message": "Something went wrong." })),
            )
                .into_response(),
        }
    }
}

/// Startup failures of the binary.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to load configuration: {0}")]
    Config(#[from] docdesk::ConfigError),

    #[error("Failed to open dashboard: {0}")]
    Open(#[from] docdesk::DocdeskError),

    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}
