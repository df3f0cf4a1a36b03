//! In-memory backend.
//!
//! [`MemoryStore`] keeps rows in insertion order behind a
//! [`tokio::sync::RwLock`] and reports exactly the same `Missing` and
//! `Duplicate` signals as the `SQLite` stores. [`MemoryUserStore`] adds the
//! tombstone list. Nothing survives a restart.

use async_trait::async_trait;
use cryptid_types::{Record, User};
use rand::seq::IndexedRandom;
use tokio::sync::RwLock;

use crate::error::DbError;
use crate::repository::{Repository, UserRepository};

/// A table held in process memory.
#[derive(Debug)]
pub struct MemoryStore<R> {
    rows: RwLock<Vec<R>>,
}

impl<R: Record> MemoryStore<R> {
    /// Create an empty store.
    pub const fn new() -> Self {
        Self {
            rows: RwLock::const_new(Vec::new()),
        }
    }

    /// Create a store pre-populated with `rows`.
    ///
    /// Later rows with a key already seen are dropped.
    pub fn with_rows(rows: impl IntoIterator<Item = R>) -> Self {
        let mut seeded: Vec<R> = Vec::new();
        for row in rows {
            if !seeded.iter().any(|r| r.name() == row.name()) {
                seeded.push(row);
            }
        }
        Self {
            rows: RwLock::new(seeded),
        }
    }

    /// Remove the row keyed by `name` and hand it back.
    async fn take(&self, name: &str) -> Result<R, DbError> {
        let mut rows = self.rows.write().await;
        let index = rows
            .iter()
            .position(|r| r.name() == name)
            .ok_or_else(|| DbError::missing::<R>(name))?;
        Ok(rows.remove(index))
    }
}

impl<R: Record> Default for MemoryStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: Record> Repository<R> for MemoryStore<R> {
    async fn create(&self, record: &R) -> Result<R, DbError> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|r| r.name() == record.name()) {
            return Err(DbError::duplicate::<R>(record.name()));
        }
        rows.push(record.clone());
        Ok(record.clone())
    }

    async fn get_one(&self, name: &str) -> Result<R, DbError> {
        let rows = self.rows.read().await;
        rows.iter()
            .find(|r| r.name() == name)
            .cloned()
            .ok_or_else(|| DbError::missing::<R>(name))
    }

    async fn get_all(&self) -> Result<Vec<R>, DbError> {
        Ok(self.rows.read().await.clone())
    }

    async fn modify(&self, name: &str, record: &R) -> Result<R, DbError> {
        let mut rows = self.rows.write().await;
        let index = rows
            .iter()
            .position(|r| r.name() == name)
            .ok_or_else(|| DbError::missing::<R>(name))?;

        if record.name() != name && rows.iter().any(|r| r.name() == record.name()) {
            return Err(DbError::duplicate::<R>(record.name()));
        }

        if let Some(slot) = rows.get_mut(index) {
            *slot = record.clone();
        }
        Ok(record.clone())
    }

    async fn delete(&self, name: &str) -> Result<(), DbError> {
        self.take(name).await.map(|_| ())
    }

    async fn random_name(&self) -> Result<Option<String>, DbError> {
        let rows = self.rows.read().await;
        Ok(rows
            .choose(&mut rand::rng())
            .map(|r| r.name().to_owned()))
    }
}

/// In-memory users plus their tombstones.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: MemoryStore<User>,
    tombstones: RwLock<Vec<User>>,
}

impl MemoryUserStore {
    /// Create an empty user store.
    pub const fn new() -> Self {
        Self {
            users: MemoryStore::new(),
            tombstones: RwLock::const_new(Vec::new()),
        }
    }

    /// Create a user store pre-populated with `users`.
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        Self {
            users: MemoryStore::with_rows(users),
            tombstones: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Repository<User> for MemoryUserStore {
    async fn create(&self, user: &User) -> Result<User, DbError> {
        self.users.create(user).await
    }

    async fn get_one(&self, name: &str) -> Result<User, DbError> {
        self.users.get_one(name).await
    }

    async fn get_all(&self) -> Result<Vec<User>, DbError> {
        self.users.get_all().await
    }

    async fn modify(&self, name: &str, user: &User) -> Result<User, DbError> {
        self.users.modify(name, user).await
    }

    async fn delete(&self, name: &str) -> Result<(), DbError> {
        let user = self.users.take(name).await?;
        let mut tombstones = self.tombstones.write().await;
        tombstones.retain(|t| t.name != user.name);
        tombstones.push(user);
        Ok(())
    }

    async fn random_name(&self) -> Result<Option<String>, DbError> {
        self.users.random_name().await
    }
}

#[async_trait]
impl UserRepository for MemoryUserStore {
    async fn get_tombstone(&self, name: &str) -> Result<User, DbError> {
        self.tombstones
            .read()
            .await
            .iter()
            .find(|t| t.name == name)
            .cloned()
            .ok_or_else(|| DbError::missing::<User>(name))
    }

    async fn get_tombstones(&self) -> Result<Vec<User>, DbError> {
        Ok(self.tombstones.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use cryptid_types::Creature;

    use super::*;

    fn yeti() -> Creature {
        Creature {
            country: Some(String::from("Nepal")),
            ..Creature::named("Yeti")
        }
    }

    #[tokio::test]
    async fn duplicate_create_leaves_original() {
        let store = MemoryStore::new();
        store.create(&yeti()).await.unwrap();

        let mut clash = Creature::named("Yeti");
        clash.country = Some(String::from("Bhutan"));
        let err = store.create(&clash).await.unwrap_err();
        assert!(err.is_duplicate());

        assert_eq!(store.get_one("Yeti").await.unwrap(), yeti());
    }

    #[tokio::test]
    async fn missing_key_signals_missing() {
        let store: MemoryStore<Creature> = MemoryStore::new();
        assert!(store.get_one("Nessie").await.unwrap_err().is_missing());
        assert!(store.delete("Nessie").await.unwrap_err().is_missing());
        assert!(
            store
                .modify("Nessie", &Creature::named("Nessie"))
                .await
                .unwrap_err()
                .is_missing()
        );
        assert!(store.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn modify_rekeys_in_place() {
        let store = MemoryStore::with_rows([Creature::named("A"), yeti(), Creature::named("B")]);
        let mut renamed = yeti();
        renamed.name = String::from("Abominable Snowman");

        store.modify("Yeti", &renamed).await.unwrap();

        let names: Vec<String> = store
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, ["A", "Abominable Snowman", "B"]);
        assert!(store.get_one("Yeti").await.unwrap_err().is_missing());
    }

    #[tokio::test]
    async fn modify_onto_taken_key_is_duplicate() {
        let store = MemoryStore::with_rows([Creature::named("A"), Creature::named("B")]);
        let err = store.modify("A", &Creature::named("B")).await.unwrap_err();
        assert!(err.is_duplicate());
        assert!(store.get_one("A").await.is_ok());
    }

    #[tokio::test]
    async fn random_name_draws_from_table() {
        let store: MemoryStore<Creature> = MemoryStore::new();
        assert!(store.random_name().await.unwrap().is_none());

        let store = MemoryStore::with_rows([Creature::named("A"), Creature::named("B")]);
        let name = store.random_name().await.unwrap().unwrap();
        assert!(name == "A" || name == "B");
    }

    #[tokio::test]
    async fn deleted_user_is_tombstoned() {
        let alice = User {
            name: String::from("alice"),
            hash: String::from("h1"),
        };
        let store = MemoryUserStore::with_users([alice.clone()]);

        store.delete("alice").await.unwrap();

        assert!(store.get_one("alice").await.unwrap_err().is_missing());
        assert_eq!(store.get_tombstone("alice").await.unwrap(), alice);
        assert!(store.delete("alice").await.unwrap_err().is_missing());
    }

    #[tokio::test]
    async fn later_tombstone_replaces_earlier() {
        let store = MemoryUserStore::new();
        for hash in ["h1", "h2"] {
            let user = User {
                name: String::from("bob"),
                hash: hash.to_owned(),
            };
            store.create(&user).await.unwrap();
            store.delete("bob").await.unwrap();
        }

        let tombstones = store.get_tombstones().await.unwrap();
        assert_eq!(tombstones.len(), 1);
        assert_eq!(tombstones.first().unwrap().hash, "h2");
    }
}
