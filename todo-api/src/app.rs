/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use todo_api::{app::AppState, config::Config};
/// use todo_shared::{auth::session::SessionStore, db::pool::{create_pool, DatabaseConfig}};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(DatabaseConfig {
///     url: config.database.url.clone(),
///     ..Default::default()
/// })
/// .await?;
/// let sessions = SessionStore::new(config.session_idle_timeout());
/// let app = todo_api::app::build_router(AppState::new(pool, config, sessions)?);
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    middleware::{security::SecurityHeadersLayer, session::require_login},
    routes,
};
use axum::{extract::FromRef, middleware::from_fn_with_state, routing::get, Router};
use axum_extra::extract::cookie::Key;
use sqlx::SqlitePool;
use std::sync::Arc;
use todo_shared::auth::session::SessionStore;
use tower_http::{
    compression::CompressionLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor. Clones share
/// the same pool, config and session map.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Live sessions
    pub sessions: SessionStore,

    /// Key that signs the session and flash cookies
    pub cookie_key: Key,
}

impl AppState {
    /// Creates new application state
    ///
    /// # Errors
    ///
    /// Fails if `SECRET_KEY` is too short to derive a cookie key from.
    pub fn new(db: SqlitePool, config: Config, sessions: SessionStore) -> anyhow::Result<Self> {
        let cookie_key = config.cookie_key()?;

        Ok(Self {
            db,
            config: Arc::new(config),
            sessions,
            cookie_key,
        })
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                 # Health check (public)
/// ├── /register               # GET form, POST create account (public)
/// ├── /login                  # GET form, POST start session (public)
/// └── login required:
///     ├── /                   # GET list, POST create task
///     ├── /edit/:id           # GET form, POST update text
///     ├── /delete/:id         # GET|POST
///     ├── /completed/:id      # GET|POST
///     ├── /incompleted/:id    # GET|POST
///     └── /logout             # GET
/// ```
///
/// Unknown paths render the 404 page. The login gate is a route layer, so it
/// only runs for matched protected routes.
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. Compression (tower-http CompressionLayer)
/// 3. Security headers
pub fn build_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/", get(routes::tasks::index).post(routes::tasks::create))
        .route(
            "/edit/:id",
            get(routes::tasks::edit_form).post(routes::tasks::update),
        )
        .route(
            "/delete/:id",
            get(routes::tasks::delete).post(routes::tasks::delete),
        )
        .route(
            "/completed/:id",
            get(routes::tasks::mark_complete).post(routes::tasks::mark_complete),
        )
        .route(
            "/incompleted/:id",
            get(routes::tasks::mark_incomplete).post(routes::tasks::mark_incomplete),
        )
        .route("/logout", get(routes::auth::logout))
        .route_layer(from_fn_with_state(state.clone(), require_login));

    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route(
            "/register",
            get(routes::auth::register_form).post(routes::auth::register),
        )
        .route(
            "/login",
            get(routes::auth::login_form).post(routes::auth::login),
        );

    Router::new()
        .merge(protected_routes)
        .merge(public_routes)
        .fallback(routes::not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CompressionLayer::new())
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}
