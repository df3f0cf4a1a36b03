//! Integration tests for the `cryptid-db` `SQLite` stores.
//!
//! Each test opens a fresh database file inside a temporary directory,
//! runs the embedded migrations, and exercises one store.

// Integration tests use expect/unwrap extensively for clarity -- panicking
// on failure is the correct behavior in test code.
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    clippy::indexing_slicing
)]

use cryptid_db::{
    CreatureStore, Database, DatabaseConfig, DbError, ExplorerStore, Repository, UserRepository,
    UserStore,
};
use cryptid_types::{Creature, Explorer, User};
use tempfile::TempDir;

// =============================================================================
// Helper: open a migrated database in a temp directory
// =============================================================================

async fn setup() -> (TempDir, Database) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db = Database::connect_path(dir.path().join("cryptid.db"))
        .await
        .expect("Failed to open SQLite database");
    db.run_migrations()
        .await
        .expect("Failed to run migrations");
    (dir, db)
}

fn yeti() -> Creature {
    Creature {
        name: String::from("Yeti"),
        country: Some(String::from("Nepal")),
        area: Some(String::from("Himalayas")),
        description: Some(String::from("Hirsute Himalayan")),
        aka: Some(String::from("Abominable Snowman")),
    }
}

fn user(name: &str, hash: &str) -> User {
    User {
        name: name.to_owned(),
        hash: hash.to_owned(),
    }
}

// =============================================================================
// Schema
// =============================================================================

#[tokio::test]
async fn migrations_are_idempotent() {
    let (_dir, db) = setup().await;
    db.run_migrations()
        .await
        .expect("Second migration run should be a no-op");
    db.close().await;
}

#[tokio::test]
async fn zero_connections_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = DatabaseConfig::new(dir.path().join("x.db")).with_max_connections(0);
    let result = Database::connect(&config).await;
    assert!(matches!(result, Err(DbError::Config(_))));
}

#[tokio::test]
async fn missing_file_without_create_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = DatabaseConfig::new(dir.path().join("absent.db")).with_create_if_missing(false);
    assert!(Database::connect(&config).await.is_err());
}

// =============================================================================
// Creature store
// =============================================================================

#[tokio::test]
async fn creature_roundtrip() {
    let (_dir, db) = setup().await;
    let store = CreatureStore::new(db);

    let created = store.create(&yeti()).await.unwrap();
    assert_eq!(created, yeti());
    assert_eq!(store.get_one("Yeti").await.unwrap(), yeti());
}

#[tokio::test]
async fn creature_optional_fields_roundtrip_as_none() {
    let (_dir, db) = setup().await;
    let store = CreatureStore::new(db);

    store.create(&Creature::named("Mothman")).await.unwrap();
    assert_eq!(
        store.get_one("Mothman").await.unwrap(),
        Creature::named("Mothman")
    );
}

#[tokio::test]
async fn creature_duplicate_leaves_original_unchanged() {
    let (_dir, db) = setup().await;
    let store = CreatureStore::new(db);
    store.create(&yeti()).await.unwrap();

    let mut clash = Creature::named("Yeti");
    clash.country = Some(String::from("Bhutan"));
    let err = store.create(&clash).await.unwrap_err();

    assert!(err.is_duplicate(), "expected Duplicate, got {err:?}");
    assert_eq!(store.get_one("Yeti").await.unwrap(), yeti());
}

#[tokio::test]
async fn creature_missing_key_signals_missing_without_writes() {
    let (_dir, db) = setup().await;
    let store = CreatureStore::new(db);
    store.create(&yeti()).await.unwrap();

    assert!(store.get_one("Nessie").await.unwrap_err().is_missing());
    assert!(
        store
            .modify("Nessie", &Creature::named("Nessie"))
            .await
            .unwrap_err()
            .is_missing()
    );
    assert!(store.delete("Nessie").await.unwrap_err().is_missing());

    assert_eq!(store.get_all().await.unwrap(), vec![yeti()]);
}

#[tokio::test]
async fn creature_modify_overwrites_and_rekeys() {
    let (_dir, db) = setup().await;
    let store = CreatureStore::new(db);
    store.create(&yeti()).await.unwrap();

    let replacement = Creature {
        name: String::from("Migoi"),
        country: Some(String::from("Bhutan")),
        area: None,
        description: Some(String::from("Wild man")),
        aka: None,
    };
    let modified = store.modify("Yeti", &replacement).await.unwrap();

    assert_eq!(modified, replacement);
    assert_eq!(store.get_one("Migoi").await.unwrap(), replacement);
    assert!(store.get_one("Yeti").await.unwrap_err().is_missing());
}

#[tokio::test]
async fn creature_rekey_onto_existing_is_duplicate() {
    let (_dir, db) = setup().await;
    let store = CreatureStore::new(db);
    store.create(&yeti()).await.unwrap();
    store.create(&Creature::named("Bigfoot")).await.unwrap();

    let err = store
        .modify("Bigfoot", &Creature::named("Yeti"))
        .await
        .unwrap_err();

    assert!(err.is_duplicate());
    assert_eq!(store.get_one("Yeti").await.unwrap(), yeti());
    assert!(store.get_one("Bigfoot").await.is_ok());
}

#[tokio::test]
async fn creature_scenario_create_get_duplicate_delete() {
    let (_dir, db) = setup().await;
    let store = CreatureStore::new(db);
    let record = Creature {
        country: Some(String::from("Nepal")),
        ..Creature::named("Yeti")
    };

    store.create(&record).await.unwrap();
    assert_eq!(store.get_one("Yeti").await.unwrap(), record);
    assert!(store.create(&record).await.unwrap_err().is_duplicate());
    store.delete("Yeti").await.unwrap();
    assert!(store.get_one("Yeti").await.unwrap_err().is_missing());
}

#[tokio::test]
async fn creature_get_all_and_random_name() {
    let (_dir, db) = setup().await;
    let store = CreatureStore::new(db);
    assert!(store.random_name().await.unwrap().is_none());

    for name in ["Yeti", "Bigfoot", "Nessie"] {
        store.create(&Creature::named(name)).await.unwrap();
    }

    let all = store.get_all().await.unwrap();
    assert_eq!(all.len(), 3);

    let picked = store.random_name().await.unwrap().unwrap();
    assert!(all.iter().any(|c| c.name == picked));
}

// =============================================================================
// Explorer store
// =============================================================================

#[tokio::test]
async fn explorer_crud() {
    let (_dir, db) = setup().await;
    let store = ExplorerStore::new(db);
    let beebe = Explorer {
        name: String::from("Beebe"),
        country: Some(String::from("US")),
        description: Some(String::from("Bathysphere diver")),
    };

    store.create(&beebe).await.unwrap();
    assert_eq!(store.get_one("Beebe").await.unwrap(), beebe);
    assert!(store.create(&beebe).await.unwrap_err().is_duplicate());

    let mut updated = beebe.clone();
    updated.description = Some(String::from("Naturalist"));
    assert_eq!(store.modify("Beebe", &updated).await.unwrap(), updated);

    store.delete("Beebe").await.unwrap();
    assert!(store.delete("Beebe").await.unwrap_err().is_missing());
    assert!(store.get_all().await.unwrap().is_empty());
}

// =============================================================================
// User store
// =============================================================================

#[tokio::test]
async fn user_roundtrip_and_duplicate() {
    let (_dir, db) = setup().await;
    let store = UserStore::new(db);
    let alice = user("alice", "$argon2id$v=19$hash");

    store.create(&alice).await.unwrap();
    assert_eq!(store.get_one("alice").await.unwrap(), alice);

    let err = store.create(&user("alice", "other")).await.unwrap_err();
    assert!(matches!(err, DbError::Duplicate(_)));
    assert_eq!(store.get_one("alice").await.unwrap().hash, alice.hash);
}

#[tokio::test]
async fn user_delete_moves_row_to_tombstone() {
    let (_dir, db) = setup().await;
    let store = UserStore::new(db);
    let alice = user("alice", "h1");
    store.create(&alice).await.unwrap();

    store.delete("alice").await.unwrap();

    assert!(store.get_one("alice").await.unwrap_err().is_missing());
    assert_eq!(store.get_tombstone("alice").await.unwrap(), alice);
    assert_eq!(store.get_tombstones().await.unwrap(), vec![alice]);
}

#[tokio::test]
async fn user_delete_missing_writes_no_tombstone() {
    let (_dir, db) = setup().await;
    let store = UserStore::new(db);

    assert!(store.delete("ghost").await.unwrap_err().is_missing());
    assert!(store.get_tombstones().await.unwrap().is_empty());
    assert!(store.get_tombstone("ghost").await.unwrap_err().is_missing());
}

#[tokio::test]
async fn user_delete_rolls_back_when_tombstone_write_fails() {
    let (_dir, db) = setup().await;
    let store = UserStore::new(db.clone());
    store.create(&user("alice", "h1")).await.unwrap();

    sqlx::query("DROP TABLE xuser")
        .execute(db.pool())
        .await
        .unwrap();

    let err = store.delete("alice").await.unwrap_err();
    assert!(matches!(err, DbError::Sqlite(_)));
    assert_eq!(store.get_one("alice").await.unwrap(), user("alice", "h1"));
}

#[tokio::test]
async fn user_redeleted_replaces_tombstone() {
    let (_dir, db) = setup().await;
    let store = UserStore::new(db);

    store.create(&user("bob", "h1")).await.unwrap();
    store.delete("bob").await.unwrap();
    store.create(&user("bob", "h2")).await.unwrap();
    store.delete("bob").await.unwrap();

    let tombstones = store.get_tombstones().await.unwrap();
    assert_eq!(tombstones, vec![user("bob", "h2")]);
}

#[tokio::test]
async fn user_modify_rekeys() {
    let (_dir, db) = setup().await;
    let store = UserStore::new(db);
    store.create(&user("alice", "h1")).await.unwrap();

    let renamed = store.modify("alice", &user("alicia", "h2")).await.unwrap();

    assert_eq!(renamed, user("alicia", "h2"));
    assert!(store.get_one("alice").await.unwrap_err().is_missing());
    assert!(
        store
            .modify("alice", &user("x", "y"))
            .await
            .unwrap_err()
            .is_missing()
    );
}
