//! Integration tests for SqlUserRepository against MySQL.
//!
//! These tests run against a real MySQL database using testcontainers and
//! need Docker, so they are ignored by default:
//! `cargo test -p aside-repository -- --ignored`

mod common;

use aside_repository::{Dialect, SqlUserRepository, UserRepository};
use common::TestDatabase;

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_create_and_find_on_mysql() {
    let db = TestDatabase::new().await;
    assert_eq!(db.pool().dialect(), Dialect::MySql);
    let repo = SqlUserRepository::new(db.pool());

    let id = repo.create("alice").await.expect("Failed to create user");
    let name = repo
        .find_name_by_id(&id.to_string())
        .await
        .expect("Failed to find user");

    assert_eq!(name, "alice");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_create_continues_after_seeded_rows_on_mysql() {
    let (db, seeded) = TestDatabase::with_users(&["alice", "bob"]).await;
    let repo = SqlUserRepository::new(db.pool());

    let id = repo.create("carol").await.expect("insert failed");

    assert!(seeded.iter().all(|seeded_id| id > *seeded_id));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_seeded_rows_are_found_on_mysql() {
    let (db, ids) = TestDatabase::with_users(&["alice", "bob"]).await;
    let repo = SqlUserRepository::new(db.pool());

    assert_eq!(repo.find_name_by_id(&ids[0].to_string()).await.unwrap(), "alice");
    assert_eq!(repo.find_name_by_id(&ids[1].to_string()).await.unwrap(), "bob");
    assert!(repo.find_name_by_id("999").await.unwrap_err().is_not_found());
    assert!(repo.find_name_by_id("abc").await.unwrap_err().is_not_found());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_direct_update_is_visible_on_mysql() {
    let (db, ids) = TestDatabase::with_users(&["alice"]).await;
    let repo = SqlUserRepository::new(db.pool());

    db.rename(ids[0], "alice2").await;

    assert_eq!(repo.find_name_by_id(&ids[0].to_string()).await.unwrap(), "alice2");
}
