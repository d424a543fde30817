/// Shared helpers for the store integration tests
///
/// Every test gets its own private in-memory database with migrations applied.

use sqlx::SqlitePool;
use todo_shared::db::migrations::run_migrations;
use todo_shared::db::pool::{create_pool, DatabaseConfig};
use todo_shared::models::user::{CreateUser, User};

/// Creates a fresh, migrated in-memory database
pub async fn test_pool() -> SqlitePool {
    let pool = create_pool(DatabaseConfig::in_memory())
        .await
        .expect("Failed to create pool");
    run_migrations(&pool).await.expect("Failed to run migrations");
    pool
}

/// Inserts a user directly, skipping password hashing
pub async fn insert_user(pool: &SqlitePool, email: &str) -> User {
    User::create(
        pool,
        CreateUser {
            email: email.to_string(),
            password_hash: "not-a-real-hash".to_string(),
        },
    )
    .await
    .expect("Failed to insert user")
}
