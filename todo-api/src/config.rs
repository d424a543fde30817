/// Configuration management for the web server
///
/// This module loads configuration from environment variables and provides
/// a type-safe configuration struct.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: SQLite connection string (required)
/// - `SECRET_KEY`: Secret key for signing session cookies (required)
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `SESSION_IDLE_MINUTES`: Minutes of inactivity before a session expires (default: 60)
/// - `APP_ENV`: `production` enables Secure cookies and HSTS
/// - `RUST_LOG`: Log level (default: info)
///
/// # Example
///
/// ```no_run
/// use todo_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use axum_extra::extract::cookie::Key;
use serde::{Deserialize, Serialize};
use std::{env, time::Duration};

/// Minimum accepted length of `SECRET_KEY`
pub const MIN_SECRET_LEN: usize = 32;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Session configuration
    pub session: SessionConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Production mode (HTTPS assumed)
    pub production: bool,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// Session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Secret key for signing session cookies
    ///
    /// Generate with: `openssl rand -hex 16`
    #[serde(skip_serializing)]
    pub secret: String,

    /// Minutes of inactivity before a session expires
    pub idle_minutes: u64,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `DATABASE_URL` or `SECRET_KEY` is missing
    /// - `SECRET_KEY` is shorter than 32 characters
    /// - A numeric variable does not parse
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("API_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()?;
        let production = env::var("APP_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()?;

        let secret = env::var("SECRET_KEY")
            .map_err(|_| anyhow::anyhow!("SECRET_KEY environment variable is required"))?;

        let idle_minutes = env::var("SESSION_IDLE_MINUTES")
            .unwrap_or_else(|_| "60".to_string())
            .parse::<u64>()?;

        let config = Self {
            api: ApiConfig {
                host,
                port,
                production,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            session: SessionConfig {
                secret,
                idle_minutes,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Checks invariants that the environment cannot express
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.session.secret.len() < MIN_SECRET_LEN {
            anyhow::bail!("SECRET_KEY must be at least {} characters long", MIN_SECRET_LEN);
        }
        if self.database.max_connections == 0 {
            anyhow::bail!("DATABASE_MAX_CONNECTIONS must be greater than zero");
        }
        if self.session.idle_minutes == 0 {
            anyhow::bail!("SESSION_IDLE_MINUTES must be greater than zero");
        }
        Ok(())
    }

    /// Derives the cookie signing key from `SECRET_KEY`
    pub fn cookie_key(&self) -> anyhow::Result<Key> {
        if self.session.secret.len() < MIN_SECRET_LEN {
            anyhow::bail!("SECRET_KEY must be at least {} characters long", MIN_SECRET_LEN);
        }
        Ok(Key::derive_from(self.session.secret.as_bytes()))
    }

    /// Inactivity after which a session expires
    pub fn session_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.session.idle_minutes * 60)
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}
