/// Integration tests for the task store and the ownership guard
///
/// Run with: cargo test -p todo-shared --test tasks_tests

mod common;

use todo_shared::auth::authorization::{authorize_task_access, AuthzError};
use todo_shared::models::task::{CreateTask, Task, TaskError};

async fn create(pool: &sqlx::SqlitePool, owner_id: i64, text: &str) -> Result<Task, TaskError> {
    Task::create(
        pool,
        CreateTask {
            owner_id,
            text: text.to_string(),
        },
    )
    .await
}

#[tokio::test]
async fn test_created_task_appears_in_incomplete_list() {
    let pool = common::test_pool().await;
    let owner = common::insert_user(&pool, "a@x.com").await;

    let task = create(&pool, owner.id, "Buy milk").await.unwrap();
    assert!(!task.complete);
    assert_eq!(task.owner_id, owner.id);

    let incomplete = Task::list_for_owner(&pool, owner.id, false).await.unwrap();
    assert_eq!(incomplete, vec![task]);

    let completed = Task::list_for_owner(&pool, owner.id, true).await.unwrap();
    assert!(completed.is_empty());
}

#[tokio::test]
async fn test_text_length_boundaries() {
    let pool = common::test_pool().await;
    let owner = common::insert_user(&pool, "a@x.com").await;

    assert!(matches!(
        create(&pool, owner.id, "a").await,
        Err(TaskError::InvalidText(1))
    ));
    assert!(create(&pool, owner.id, "ab").await.is_ok());
    assert!(create(&pool, owner.id, &"a".repeat(144)).await.is_ok());
    assert!(matches!(
        create(&pool, owner.id, &"a".repeat(145)).await,
        Err(TaskError::InvalidText(145))
    ));

    // Rejected writes leave nothing behind
    assert_eq!(Task::count_for_owner(&pool, owner.id).await.unwrap(), 2);
}

#[tokio::test]
async fn test_control_characters_are_rejected_before_sql() {
    let pool = common::test_pool().await;
    let owner = common::insert_user(&pool, "a@x.com").await;

    assert!(matches!(
        create(&pool, owner.id, "a\0bcd").await,
        Err(TaskError::ControlCharacter)
    ));

    let task = create(&pool, owner.id, "Buy milk").await.unwrap();
    let rejected = Task::update_text(&pool, task.id, owner.id, "Buy\0milk").await;
    assert!(matches!(rejected, Err(TaskError::ControlCharacter)));

    assert_eq!(Task::count_for_owner(&pool, owner.id).await.unwrap(), 1);
    let unchanged = Task::find_by_id(&pool, task.id).await.unwrap().unwrap();
    assert_eq!(unchanged.text, "Buy milk");
}

#[tokio::test]
async fn test_update_text_validates_and_persists() {
    let pool = common::test_pool().await;
    let owner = common::insert_user(&pool, "a@x.com").await;
    let task = create(&pool, owner.id, "Buy milk").await.unwrap();

    let rejected = Task::update_text(&pool, task.id, owner.id, "x").await;
    assert!(matches!(rejected, Err(TaskError::InvalidText(1))));

    let unchanged = Task::find_by_id(&pool, task.id).await.unwrap().unwrap();
    assert_eq!(unchanged.text, "Buy milk");

    let updated = Task::update_text(&pool, task.id, owner.id, "Buy oat milk")
        .await
        .unwrap()
        .expect("Owner should be able to update");
    assert_eq!(updated.text, "Buy oat milk");
    assert_eq!(updated.id, task.id);
}

#[tokio::test]
async fn test_mark_complete_is_idempotent() {
    let pool = common::test_pool().await;
    let owner = common::insert_user(&pool, "a@x.com").await;
    let task = create(&pool, owner.id, "Buy milk").await.unwrap();

    let first = Task::set_complete(&pool, task.id, owner.id, true).await.unwrap();
    let second = Task::set_complete(&pool, task.id, owner.id, true).await.unwrap();

    assert!(first.unwrap().complete);
    assert!(second.unwrap().complete);

    let completed = Task::list_for_owner(&pool, owner.id, true).await.unwrap();
    assert_eq!(completed.len(), 1);

    let reopened = Task::set_complete(&pool, task.id, owner.id, false)
        .await
        .unwrap()
        .unwrap();
    assert!(!reopened.complete);
}

#[tokio::test]
async fn test_delete_is_permanent() {
    let pool = common::test_pool().await;
    let owner = common::insert_user(&pool, "a@x.com").await;
    let task = create(&pool, owner.id, "Buy milk").await.unwrap();

    assert!(Task::delete(&pool, task.id, owner.id).await.unwrap());
    assert!(Task::find_by_id(&pool, task.id).await.unwrap().is_none());
    assert!(!Task::delete(&pool, task.id, owner.id).await.unwrap());
}

#[tokio::test]
async fn test_lists_are_scoped_to_owner_in_insertion_order() {
    let pool = common::test_pool().await;
    let alice = common::insert_user(&pool, "alice@x.com").await;
    let bob = common::insert_user(&pool, "bob@x.com").await;

    let first = create(&pool, alice.id, "First").await.unwrap();
    create(&pool, bob.id, "Bob's task").await.unwrap();
    let second = create(&pool, alice.id, "Second").await.unwrap();

    let alice_tasks = Task::list_for_owner(&pool, alice.id, false).await.unwrap();
    let ids: Vec<i64> = alice_tasks.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);
}

#[tokio::test]
async fn test_authorize_task_access_for_owner() {
    let pool = common::test_pool().await;
    let owner = common::insert_user(&pool, "a@x.com").await;
    let task = create(&pool, owner.id, "Buy milk").await.unwrap();

    let loaded = authorize_task_access(&pool, owner.id, task.id).await.unwrap();
    assert_eq!(loaded, task);
}

#[tokio::test]
async fn test_foreign_and_missing_tasks_are_not_found() {
    let pool = common::test_pool().await;
    let alice = common::insert_user(&pool, "alice@x.com").await;
    let bob = common::insert_user(&pool, "bob@x.com").await;
    let task = create(&pool, alice.id, "Alice's task").await.unwrap();

    let foreign = authorize_task_access(&pool, bob.id, task.id).await;
    assert!(matches!(foreign, Err(AuthzError::NotFound(id)) if id == task.id));

    let missing = authorize_task_access(&pool, bob.id, task.id + 1000).await;
    assert!(matches!(missing, Err(AuthzError::NotFound(_))));
}

#[tokio::test]
async fn test_other_user_cannot_mutate_task() {
    let pool = common::test_pool().await;
    let alice = common::insert_user(&pool, "alice@x.com").await;
    let bob = common::insert_user(&pool, "bob@x.com").await;
    let task = create(&pool, alice.id, "Alice's task").await.unwrap();

    assert!(Task::update_text(&pool, task.id, bob.id, "Hijacked").await.unwrap().is_none());
    assert!(Task::set_complete(&pool, task.id, bob.id, true).await.unwrap().is_none());
    assert!(!Task::delete(&pool, task.id, bob.id).await.unwrap());

    let untouched = Task::find_by_id(&pool, task.id).await.unwrap().unwrap();
    assert_eq!(untouched, task);
}

#[tokio::test]
async fn test_task_requires_existing_owner() {
    let pool = common::test_pool().await;

    let result = create(&pool, 9999, "Orphan").await;
    assert!(matches!(result, Err(TaskError::Database(_))));
}
