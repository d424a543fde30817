/// Health check endpoint
///
/// Reports whether the server can reach its database and whether the schema
/// is fully migrated. Public; no session required.
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "database": "connected",
///   "migrations": "up_to_date"
/// }
/// ```

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use todo_shared::db::{migrations::get_migration_status, pool::health_check as ping};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Application version
    pub version: String,

    /// Database status
    pub database: String,

    /// Migration status
    pub migrations: String,
}

/// Health check handler
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let connected = ping(&state.db).await.is_ok();

    let migrations = match get_migration_status(&state.db).await {
        Ok(status) if status.is_up_to_date => "up_to_date",
        Ok(_) => "pending",
        Err(_) => "unknown",
    };

    let healthy = connected && migrations == "up_to_date";

    Ok(Json(HealthResponse {
        status: if healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: if connected { "connected" } else { "disconnected" }.to_string(),
        migrations: migrations.to_string(),
    }))
}
