/// Task ownership checks
///
/// Every route that reads or mutates a single task goes through
/// [`authorize_task_access`] first. A task that does not exist and a task that
/// belongs to someone else produce the same `AuthzError::NotFound`, so a
/// caller cannot probe for other users' task IDs.
///
/// # Example
///
/// ```no_run
/// use todo_shared::auth::authorization::{authorize_task_access, AuthzError};
/// use sqlx::SqlitePool;
///
/// # async fn example(pool: SqlitePool, user_id: i64, task_id: i64) -> Result<(), AuthzError> {
/// let task = authorize_task_access(&pool, user_id, task_id).await?;
/// assert_eq!(task.owner_id, user_id);
/// # Ok(())
/// # }
/// ```

use sqlx::SqlitePool;
use tracing::debug;

use crate::models::task::Task;

/// Error type for ownership checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// Task is missing or owned by another user
    #[error("Task {0} not found")]
    NotFound(i64),

    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Checks that `user_id` owns `task`
pub fn require_owner(task: &Task, user_id: i64) -> Result<(), AuthzError> {
    if task.owner_id == user_id {
        Ok(())
    } else {
        Err(AuthzError::NotFound(task.id))
    }
}

/// Loads a task on behalf of `user_id`
///
/// # Errors
///
/// - `AuthzError::NotFound` if the task does not exist or is not owned by `user_id`
/// - `AuthzError::DatabaseError` if the lookup fails
pub async fn authorize_task_access(
    pool: &SqlitePool,
    user_id: i64,
    task_id: i64,
) -> Result<Task, AuthzError> {
    let task = Task::find_by_id(pool, task_id)
        .await?
        .ok_or(AuthzError::NotFound(task_id))?;

    if let Err(e) = require_owner(&task, user_id) {
        debug!(user_id, task_id, "Denied access to task owned by another user");
        return Err(e);
    }

    Ok(task)
}
