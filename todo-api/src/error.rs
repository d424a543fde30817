/// Error handling for the web server
///
/// Handlers return `Result<T, ApiError>`. Errors that are part of normal form
/// handling (validation failures, taken emails, bad credentials) never reach
/// this type; they are rendered inline by the handler. What is left maps to
/// one of two HTML error pages:
///
/// - `NotFound` → 404, used for missing tasks *and* for tasks owned by
///   someone else
/// - `InternalError` → 500, logged server-side, no details sent to the client

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::fmt;
use todo_shared::auth::{
    authorization::AuthzError, credentials::CredentialError, password::PasswordError,
};
use todo_shared::models::task::TaskError;
use validator::ValidationErrors;

use crate::views;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified error type
#[derive(Debug)]
pub enum ApiError {
    /// Not found (404)
    NotFound(String),

    /// Internal server error (500)
    InternalError(String),
}

/// Validation error detail shown next to a form field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

impl ValidationErrorDetail {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Flattens `validator` errors into per-field messages
pub fn validation_details(errors: &ValidationErrors) -> Vec<ValidationErrorDetail> {
    let mut details: Vec<ValidationErrorDetail> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| ValidationErrorDetail {
                field: field.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Validation failed".to_string()),
            })
        })
        .collect();

    // field_errors() is a HashMap; keep rendering order stable
    details.sort_by(|a, b| a.field.cmp(&b.field));
    details
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(msg) => {
                tracing::debug!("Not found: {}", msg);
                (StatusCode::NOT_FOUND, views::not_found_page()).into_response()
            }
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, views::server_error_page()).into_response()
            }
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::InternalError(format!("Database error: {}", err))
    }
}

impl From<AuthzError> for ApiError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::NotFound(task_id) => ApiError::NotFound(format!("task {}", task_id)),
            AuthzError::DatabaseError(err) => err.into(),
        }
    }
}

impl From<TaskError> for ApiError {
    fn from(err: TaskError) -> Self {
        match err {
            TaskError::Database(err) => err.into(),
            // Handlers render length errors inline; reaching here is a bug
            TaskError::InvalidText(len) => {
                ApiError::InternalError(format!("Unvalidated task text of length {}", len))
            }
            TaskError::ControlCharacter => {
                ApiError::InternalError("Unvalidated task text with control characters".to_string())
            }
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

impl From<CredentialError> for ApiError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::Password(err) => err.into(),
            CredentialError::Database(err) => err.into(),
            other => ApiError::InternalError(format!("Unhandled credential error: {}", other)),
        }
    }
}
