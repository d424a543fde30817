/// Credential store: account registration and password authentication
///
/// Plaintext passwords only ever exist in memory for the duration of a call.
/// Hashing and verification are CPU-bound (Argon2id with 64 MB of memory), so
/// they run on the blocking thread pool instead of stalling the async
/// executor.
///
/// # Example
///
/// ```no_run
/// use todo_shared::auth::credentials::{authenticate, register, CredentialError};
/// use sqlx::SqlitePool;
///
/// # async fn example(pool: SqlitePool) -> Result<(), CredentialError> {
/// let user = register(&pool, "a@x.com", "Abcdef1!").await?;
///
/// let same = authenticate(&pool, "a@x.com", "Abcdef1!").await?;
/// assert_eq!(user.id, same.id);
///
/// assert!(matches!(
///     authenticate(&pool, "a@x.com", "wrong").await,
///     Err(CredentialError::InvalidCredentials)
/// ));
/// # Ok(())
/// # }
/// ```

use std::sync::OnceLock;

use sqlx::SqlitePool;
use tracing::{debug, info};

use super::password::{hash_password, verify_password, PasswordError};
use crate::models::user::{CreateUser, User};

/// Error type for registration and authentication
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// Another account already uses this email
    #[error("That email is taken. Please choose a different one.")]
    EmailTaken,

    /// Unknown email or wrong password; deliberately not distinguished
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Hashing or verification failed
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Registers a new account
///
/// The email must not already be registered (exact, case-sensitive match).
/// The existence check and the insert share one transaction, and a unique
/// violation from a concurrent registration is reported as `EmailTaken` too.
///
/// # Errors
///
/// - `CredentialError::EmailTaken` if the email is already registered
/// - `CredentialError::Password` if hashing fails
/// - `CredentialError::Database` for any other database failure
pub async fn register(
    pool: &SqlitePool,
    email: &str,
    password: &str,
) -> Result<User, CredentialError> {
    let password_hash = hash_blocking(password.to_owned()).await?;

    let mut tx = pool.begin().await?;

    if User::find_by_email(&mut *tx, email).await?.is_some() {
        debug!("Registration rejected: email already registered");
        return Err(CredentialError::EmailTaken);
    }

    let created = User::create(
        &mut *tx,
        CreateUser {
            email: email.to_owned(),
            password_hash,
        },
    )
    .await;

    let user = match created {
        Ok(user) => user,
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            return Err(CredentialError::EmailTaken);
        }
        Err(e) => return Err(e.into()),
    };

    tx.commit().await?;

    info!(user_id = user.id, "Registered new user");
    Ok(user)
}

/// Verifies an email/password pair
///
/// Unknown emails and wrong passwords produce the same
/// `CredentialError::InvalidCredentials`. For unknown emails a verification
/// against a throwaway hash still runs, so both failures take about as long.
pub async fn authenticate(
    pool: &SqlitePool,
    email: &str,
    password: &str,
) -> Result<User, CredentialError> {
    let Some(user) = User::find_by_email(pool, email).await? else {
        if let Some(hash) = dummy_hash() {
            let _ = verify_blocking(password.to_owned(), hash.to_owned()).await;
        }
        debug!("Authentication failed: unknown email");
        return Err(CredentialError::InvalidCredentials);
    };

    if verify_blocking(password.to_owned(), user.password_hash.clone()).await? {
        debug!(user_id = user.id, "Authentication succeeded");
        Ok(user)
    } else {
        debug!(user_id = user.id, "Authentication failed: wrong password");
        Err(CredentialError::InvalidCredentials)
    }
}

async fn hash_blocking(password: String) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| PasswordError::Hash(format!("Hashing task failed: {}", e)))?
}

async fn verify_blocking(password: String, hash: String) -> Result<bool, PasswordError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| PasswordError::Verify(format!("Verification task failed: {}", e)))?
}

fn dummy_hash() -> Option<&'static str> {
    static DUMMY: OnceLock<Option<String>> = OnceLock::new();
    DUMMY
        .get_or_init(|| hash_password("unused-dummy-password").ok())
        .as_deref()
}
