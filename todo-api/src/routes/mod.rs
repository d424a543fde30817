/// Route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Registration, login and logout pages
/// - `tasks`: Task list and task mutations

pub mod auth;
pub mod health;
pub mod tasks;

use crate::error::ApiError;

/// Fallback for unknown paths
pub async fn not_found() -> ApiError {
    ApiError::NotFound("no such route".to_string())
}
