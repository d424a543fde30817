//! Common test utilities for integration tests
//!
//! This module provides shared infrastructure for integration tests:
//! - A private in-memory database per test, migrated
//! - The full router wired to that database
//! - Form posting and cookie helpers that act like a browser

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, Response},
    Router,
};
use sqlx::SqlitePool;
use std::time::Duration;
use todo_api::app::{build_router, AppState};
use todo_api::config::{ApiConfig, Config, DatabaseConfig as ServerDatabaseConfig, SessionConfig};
use todo_shared::auth::session::SessionStore;
use todo_shared::db::migrations::run_migrations;
use todo_shared::db::pool::{create_pool, DatabaseConfig};
use tower::ServiceExt;

pub const PASSWORD: &str = "correct horse battery staple";

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: SqlitePool,
    pub app: Router,
    pub sessions: SessionStore,
}

fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            production: false,
        },
        database: ServerDatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        },
        session: SessionConfig {
            secret: "integration-test-secret-key-0123456789".to_string(),
            idle_minutes: 60,
        },
    }
}

impl TestContext {
    /// Creates a new test context with a fresh database
    pub async fn new() -> anyhow::Result<Self> {
        let config = test_config();
        let idle_timeout = config.session_idle_timeout();
        Self::with_config(config, idle_timeout).await
    }

    /// Creates a test context whose sessions expire after `idle_timeout`
    pub async fn with_idle_timeout(idle_timeout: Duration) -> anyhow::Result<Self> {
        Self::with_config(test_config(), idle_timeout).await
    }

    async fn with_config(config: Config, idle_timeout: Duration) -> anyhow::Result<Self> {
        let db = create_pool(DatabaseConfig::in_memory()).await?;
        run_migrations(&db).await?;

        let sessions = SessionStore::new(idle_timeout);
        let app = build_router(AppState::new(db.clone(), config, sessions.clone())?);

        Ok(TestContext { db, app, sessions })
    }

    /// Sends a GET request, optionally with a `Cookie` header
    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        self.send(Method::GET, uri, cookie, None).await
    }

    /// Sends a urlencoded form POST, optionally with a `Cookie` header
    pub async fn post(
        &self,
        uri: &str,
        cookie: Option<&str>,
        fields: &[(&str, &str)],
    ) -> Response<Body> {
        self.send(Method::POST, uri, cookie, Some(encode_form(fields)))
            .await
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        cookie: Option<&str>,
        form: Option<String>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        let request = match form {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.app.clone().oneshot(request).await.unwrap()
    }

    /// Registers an account through the form
    pub async fn register(&self, email: &str, password: &str) -> Response<Body> {
        self.post(
            "/register",
            None,
            &[
                ("email", email),
                ("password", password),
                ("confirm_password", password),
            ],
        )
        .await
    }

    /// Logs in through the form and returns the `Cookie` header value to send
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .post("/login", None, &[("email", email), ("password", password)])
            .await;
        assert_eq!(response.status(), 303, "login for {} failed", email);
        cookie_pair(&response, "todo_session").expect("login set no session cookie")
    }

    /// Registers and logs in a fresh account, returning its session cookie
    pub async fn register_and_login(&self, email: &str) -> String {
        let response = self.register(email, PASSWORD).await;
        assert_eq!(response.status(), 303, "registration for {} failed", email);
        self.login(email, PASSWORD).await
    }
}

/// Encodes form fields as `application/x-www-form-urlencoded`
pub fn encode_form(fields: &[(&str, &str)]) -> String {
    serde_urlencoded::to_string(fields).unwrap()
}

/// Finds the `Set-Cookie` header for `name` and returns its `name=value` part
pub fn cookie_pair(response: &Response<Body>, name: &str) -> Option<String> {
    set_cookie(response, name).and_then(|c| c.split(';').next().map(str::to_string))
}

/// Full `Set-Cookie` header for `name`
pub fn set_cookie(response: &Response<Body>, name: &str) -> Option<String> {
    let prefix = format!("{}=", name);
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with(&prefix))
        .map(str::to_string)
}

/// Redirect target of a response
pub fn location(response: &Response<Body>) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

/// Reads the whole response body as text
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Returns the markup inside `<ul id="{id}">`
pub fn list_section<'a>(body: &'a str, id: &str) -> &'a str {
    let open = format!(r#"<ul id="{}">"#, id);
    let start = body.find(&open).expect("list not found") + open.len();
    let end = start + body[start..].find("</ul>").expect("list not closed");
    &body[start..end]
}
