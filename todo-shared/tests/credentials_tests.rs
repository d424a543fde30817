/// Integration tests for registration and authentication
///
/// Run with: cargo test -p todo-shared --test credentials_tests

mod common;

use todo_shared::auth::credentials::{authenticate, register, CredentialError};
use todo_shared::auth::password::{verify_password, PasswordError};
use todo_shared::models::user::User;

#[tokio::test]
async fn test_register_hashes_password() {
    let pool = common::test_pool().await;

    let user = register(&pool, "a@x.com", "Abcdef1!")
        .await
        .expect("Registration should succeed");

    assert_eq!(user.email, "a@x.com");
    assert_ne!(user.password_hash, "Abcdef1!");
    assert!(user.password_hash.starts_with("$argon2id$"));
    assert!(verify_password("Abcdef1!", &user.password_hash).unwrap());
}

#[tokio::test]
async fn test_duplicate_email_is_rejected_without_new_record() {
    let pool = common::test_pool().await;

    register(&pool, "a@x.com", "Abcdef1!").await.unwrap();
    let before = User::count(&pool).await.unwrap();

    let result = register(&pool, "a@x.com", "Different2@").await;
    assert!(matches!(result, Err(CredentialError::EmailTaken)));

    let after = User::count(&pool).await.unwrap();
    assert_eq!(before, after, "No record should be created");
}

#[tokio::test]
async fn test_email_match_is_case_sensitive() {
    let pool = common::test_pool().await;

    let lower = register(&pool, "a@x.com", "Abcdef1!").await.unwrap();
    let upper = register(&pool, "A@x.com", "Abcdef1!")
        .await
        .expect("Differently-cased email is a different account");

    assert_ne!(lower.id, upper.id);
    assert_eq!(User::count(&pool).await.unwrap(), 2);
}

#[tokio::test]
async fn test_authenticate_with_correct_password() {
    let pool = common::test_pool().await;

    let registered = register(&pool, "a@x.com", "Abcdef1!").await.unwrap();
    let user = authenticate(&pool, "a@x.com", "Abcdef1!")
        .await
        .expect("Correct password should authenticate");

    assert_eq!(user.id, registered.id);
}

#[tokio::test]
async fn test_authenticate_failures_are_indistinguishable() {
    let pool = common::test_pool().await;
    register(&pool, "a@x.com", "Abcdef1!").await.unwrap();

    let wrong_password = authenticate(&pool, "a@x.com", "Abcdef1?").await.unwrap_err();
    let unknown_email = authenticate(&pool, "nobody@x.com", "Abcdef1!").await.unwrap_err();
    let wrong_case = authenticate(&pool, "A@x.com", "Abcdef1!").await.unwrap_err();

    assert!(matches!(wrong_password, CredentialError::InvalidCredentials));
    assert!(matches!(unknown_email, CredentialError::InvalidCredentials));
    assert!(matches!(wrong_case, CredentialError::InvalidCredentials));
    assert_eq!(wrong_password.to_string(), unknown_email.to_string());
}

#[tokio::test]
async fn test_authenticate_rejects_empty_password() {
    let pool = common::test_pool().await;
    register(&pool, "a@x.com", "Abcdef1!").await.unwrap();

    let result = authenticate(&pool, "a@x.com", "").await;
    assert!(matches!(result, Err(CredentialError::InvalidCredentials)));
}

#[tokio::test]
async fn test_corrupt_stored_hash_never_authenticates() {
    let pool = common::test_pool().await;
    common::insert_user(&pool, "a@x.com").await;

    let result = authenticate(&pool, "a@x.com", "not-a-real-hash").await;
    assert!(matches!(
        result,
        Err(CredentialError::Password(PasswordError::CorruptHash(_)))
    ));
}
