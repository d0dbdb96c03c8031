// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running
//! (FIRESTORE_EMULATOR_HOST set). Without it they are skipped.

use user_admin::db::{FirestoreDb, UserStore};
use user_admin::error::AppError;
use user_admin::models::{NewUser, UserUpdate};

mod common;

/// Create a test database connection.
async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Unique email per test run for isolation.
fn unique_email(prefix: &str) -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}-{}@example.com", prefix, nanos)
}

#[tokio::test]
async fn test_user_document_lifecycle() {
    require_emulator!();
    let db = test_db().await;
    let email = unique_email("ada");

    // 1. Create with a generated id
    let created = db
        .create_user(&NewUser {
            name: "Ada Lovelace".to_string(),
            email: email.clone(),
            uid: "uid-ada".to_string(),
        })
        .await
        .unwrap();
    let id = created.id.clone().expect("generated id");
    assert!(created.created_at.is_some());

    // 2. Read back and list
    let fetched = db.get_user(&id).await.unwrap().expect("document exists");
    assert_eq!(fetched.name, "Ada Lovelace");
    assert_eq!(fetched.uid, "uid-ada");
    assert_eq!(fetched.id.as_deref(), Some(id.as_str()));

    let listed = db.list_users().await.unwrap();
    assert!(listed.iter().any(|u| u.id.as_deref() == Some(id.as_str())));

    // 3. Update name/email; uid untouched
    db.update_user(
        &id,
        &UserUpdate {
            name: "Countess Lovelace".to_string(),
            email: email.clone(),
        },
    )
    .await
    .unwrap();
    let updated = db.get_user(&id).await.unwrap().unwrap();
    assert_eq!(updated.name, "Countess Lovelace");
    assert_eq!(updated.uid, "uid-ada");

    // 4. Delete
    db.delete_user(&id).await.unwrap();
    assert!(db.get_user(&id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_update_missing_document_is_not_found() {
    require_emulator!();
    let db = test_db().await;

    let err = db
        .update_user(
            "does-not-exist",
            &UserUpdate {
                name: "Nobody".to_string(),
                email: unique_email("nobody"),
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
    assert!(db.get_user("does-not-exist").await.unwrap().is_none());
}

#[tokio::test]
async fn test_offline_mock_fails_every_call() {
    let db = FirestoreDb::new_mock();

    assert!(matches!(db.list_users().await, Err(AppError::Database(_))));
    assert!(matches!(db.get_user("u1").await, Err(AppError::Database(_))));
    assert!(matches!(db.delete_user("u1").await, Err(AppError::Database(_))));
}
