/// Authentication and authorization
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`credentials`]: Account registration and email/password authentication
/// - [`session`]: Process-wide registry of login sessions with idle expiry
/// - [`authorization`]: Task ownership checks
///
/// # Example
///
/// ```no_run
/// use todo_shared::auth::{credentials, session::SessionStore};
/// use sqlx::SqlitePool;
///
/// # async fn example(pool: SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
/// let sessions = SessionStore::default();
///
/// let user = credentials::authenticate(&pool, "a@x.com", "Abcdef1!").await?;
/// let session_id = sessions.login(user.id).await;
/// # Ok(())
/// # }
/// ```

pub mod password;
pub mod credentials;
pub mod session;
pub mod authorization;
