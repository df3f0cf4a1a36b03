//! Capability traits implemented by every storage backend.
//!
//! The service layer only ever holds `Arc<dyn Repository<T>>` (or
//! `Arc<dyn UserRepository>`), so the backend is chosen once at wiring
//! time.

use async_trait::async_trait;
use cryptid_types::{Record, User};

use crate::error::DbError;

/// Row-level create/read/update/delete over one table.
#[async_trait]
pub trait Repository<R: Record>: Send + Sync {
    /// Insert a new row.
    ///
    /// Fails with [`DbError::Duplicate`] if the key already exists; the
    /// existing row is left untouched.
    async fn create(&self, record: &R) -> Result<R, DbError>;

    /// Fetch the row keyed by `name`, or [`DbError::Missing`].
    async fn get_one(&self, name: &str) -> Result<R, DbError>;

    /// Fetch every row in storage order.
    async fn get_all(&self) -> Result<Vec<R>, DbError>;

    /// Overwrite every field of the row keyed by `name`, including the key.
    ///
    /// Returns the row as re-read under `record`'s key. Fails with
    /// [`DbError::Missing`] when nothing matched and with
    /// [`DbError::Duplicate`] when the new key is already taken.
    async fn modify(&self, name: &str, record: &R) -> Result<R, DbError>;

    /// Remove the row keyed by `name`, or fail with [`DbError::Missing`].
    async fn delete(&self, name: &str) -> Result<(), DbError>;

    /// Pick one key uniformly at random. `None` when the table is empty.
    async fn random_name(&self) -> Result<Option<String>, DbError>;
}

/// User storage with a tombstone table.
///
/// [`Repository::delete`] on a user store moves the row into the
/// tombstone table in the same unit of work as the delete.
#[async_trait]
pub trait UserRepository: Repository<User> {
    /// Fetch a deleted user from the tombstone table.
    async fn get_tombstone(&self, name: &str) -> Result<User, DbError>;

    /// Fetch every tombstoned user.
    async fn get_tombstones(&self) -> Result<Vec<User>, DbError>;
}
