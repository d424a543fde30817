/// Task model and database operations
///
/// A task is a single todo item owned by exactly one user. Its owner is set at
/// creation and never changes; only the text and the completion flag mutate.
///
/// Every write is a single SQL statement, so each one commits atomically.
/// Text is validated before any SQL runs, which means a rejected write never
/// touches the database.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id         INTEGER PRIMARY KEY AUTOINCREMENT,
///     text       TEXT    NOT NULL CHECK (length(text) BETWEEN 2 AND 144),
///     complete   BOOLEAN NOT NULL DEFAULT FALSE,
///     owner_id   INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TEXT    NOT NULL DEFAULT CURRENT_TIMESTAMP
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use todo_shared::models::task::{CreateTask, Task};
/// use sqlx::SqlitePool;
///
/// # async fn example(pool: SqlitePool, owner_id: i64) -> Result<(), Box<dyn std::error::Error>> {
/// let task = Task::create(&pool, CreateTask {
///     owner_id,
///     text: "Buy milk".to_string(),
/// }).await?;
///
/// Task::set_complete(&pool, task.id, owner_id, true).await?;
///
/// let done = Task::list_for_owner(&pool, owner_id, true).await?;
/// assert_eq!(done.len(), 1);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// Minimum task text length, in characters
pub const MIN_TEXT_LEN: usize = 2;

/// Maximum task text length, in characters
pub const MAX_TEXT_LEN: usize = 144;

/// Error type for task store operations
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    /// Text length is outside the allowed range
    #[error("Task text must be between 2 and 144 characters (got {0})")]
    InvalidText(usize),

    /// Text contains a control character (NUL, newline, escape, ...)
    #[error("Task text must not contain control characters")]
    ControlCharacter,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Task model representing a todo item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: i64,

    /// Task description (2 to 144 characters)
    pub text: String,

    /// Whether the task is done
    pub complete: bool,

    /// The user that owns this task
    pub owner_id: i64,

    /// When the task was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone)]
pub struct CreateTask {
    /// Owning user
    pub owner_id: i64,

    /// Task description
    pub text: String,
}

/// Checks that task text is a single line of 2 to 144 characters
///
/// Length is counted in characters, not bytes. Control characters are
/// rejected; SQLite's `length()` stops counting at a NUL, so the schema's
/// CHECK would disagree with this count.
///
/// # Example
///
/// ```
/// use todo_shared::models::task::validate_text;
///
/// assert!(validate_text("ok").is_ok());
/// assert!(validate_text("x").is_err());
/// ```
pub fn validate_text(text: &str) -> Result<(), TaskError> {
    if text.chars().any(char::is_control) {
        return Err(TaskError::ControlCharacter);
    }

    let len = text.chars().count();
    if (MIN_TEXT_LEN..=MAX_TEXT_LEN).contains(&len) {
        Ok(())
    } else {
        Err(TaskError::InvalidText(len))
    }
}

impl Task {
    /// Creates a new, incomplete task for `owner_id`
    ///
    /// # Errors
    ///
    /// - `TaskError::InvalidText` if the text length is outside [2, 144]
    /// - `TaskError::ControlCharacter` if the text contains a control character
    /// - `TaskError::Database` if the insert fails (e.g., unknown owner)
    pub async fn create(pool: &SqlitePool, data: CreateTask) -> Result<Self, TaskError> {
        validate_text(&data.text)?;

        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (text, complete, owner_id)
            VALUES (?, FALSE, ?)
            RETURNING id, text, complete, owner_id, created_at
            "#,
        )
        .bind(data.text)
        .bind(data.owner_id)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID, regardless of owner
    ///
    /// Callers acting on behalf of a user should go through
    /// [`crate::auth::authorization::authorize_task_access`] instead.
    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, text, complete, owner_id, created_at
            FROM tasks
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Replaces the text of a task owned by `owner_id`
    ///
    /// # Returns
    ///
    /// The updated task, or None if no task with that ID belongs to the owner
    ///
    /// # Errors
    ///
    /// `TaskError::InvalidText` if the new text length is outside [2, 144]
    pub async fn update_text(
        pool: &SqlitePool,
        id: i64,
        owner_id: i64,
        text: &str,
    ) -> Result<Option<Self>, TaskError> {
        validate_text(text)?;

        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET text = ?
            WHERE id = ? AND owner_id = ?
            RETURNING id, text, complete, owner_id, created_at
            "#,
        )
        .bind(text)
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Sets the completion flag of a task owned by `owner_id`
    ///
    /// Unconditional: setting a flag to its current value succeeds.
    ///
    /// # Returns
    ///
    /// The updated task, or None if no task with that ID belongs to the owner
    pub async fn set_complete(
        pool: &SqlitePool,
        id: i64,
        owner_id: i64,
        complete: bool,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET complete = ?
            WHERE id = ? AND owner_id = ?
            RETURNING id, text, complete, owner_id, created_at
            "#,
        )
        .bind(complete)
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Permanently deletes a task owned by `owner_id`
    ///
    /// # Returns
    ///
    /// True if a task was deleted, false if none matched
    pub async fn delete(pool: &SqlitePool, id: i64, owner_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ? AND owner_id = ?")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists an owner's tasks with the given completion flag, in insertion order
    pub async fn list_for_owner(
        pool: &SqlitePool,
        owner_id: i64,
        complete: bool,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, text, complete, owner_id, created_at
            FROM tasks
            WHERE owner_id = ? AND complete = ?
            ORDER BY id ASC
            "#,
        )
        .bind(owner_id)
        .bind(complete)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Counts all tasks belonging to an owner
    pub async fn count_for_owner(pool: &SqlitePool, owner_id: i64) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE owner_id = ?")
            .bind(owner_id)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}
