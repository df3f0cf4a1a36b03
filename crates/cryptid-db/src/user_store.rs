//! Operations on the `user` table and its `xuser` tombstone table.
//!
//! Deleting a user moves the row into `xuser` inside a single transaction,
//! so a failure between the two statements leaves both tables untouched.
//! The tombstone write replaces any older tombstone with the same name,
//! which keeps a re-created and re-deleted user deletable.

use async_trait::async_trait;
use cryptid_types::User;

use crate::error::DbError;
use crate::repository::{Repository, UserRepository};
use crate::sqlite::Database;

/// `SQLite`-backed user storage.
#[derive(Debug, Clone)]
pub struct UserStore {
    db: Database,
}

impl UserStore {
    /// Create a new user store bound to a connection pool.
    pub const fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Repository<User> for UserStore {
    async fn create(&self, user: &User) -> Result<User, DbError> {
        sqlx::query(r"INSERT INTO user (name, hash) VALUES (?, ?)")
            .bind(&user.name)
            .bind(&user.hash)
            .execute(self.db.pool())
            .await
            .map_err(|e| DbError::from_write::<User>(e, &user.name))?;

        tracing::debug!(name = %user.name, "Inserted user");
        Ok(user.clone())
    }

    async fn get_one(&self, name: &str) -> Result<User, DbError> {
        sqlx::query_as::<_, UserRow>(r"SELECT name, hash FROM user WHERE name = ?")
            .bind(name)
            .fetch_optional(self.db.pool())
            .await?
            .map(User::from)
            .ok_or_else(|| DbError::missing::<User>(name))
    }

    async fn get_all(&self) -> Result<Vec<User>, DbError> {
        let rows = sqlx::query_as::<_, UserRow>(r"SELECT name, hash FROM user")
            .fetch_all(self.db.pool())
            .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn modify(&self, name: &str, user: &User) -> Result<User, DbError> {
        let result = sqlx::query(r"UPDATE user SET name = ?, hash = ? WHERE name = ?")
            .bind(&user.name)
            .bind(&user.hash)
            .bind(name)
            .execute(self.db.pool())
            .await
            .map_err(|e| DbError::from_write::<User>(e, &user.name))?;

        if result.rows_affected() == 0 {
            return Err(DbError::missing::<User>(name));
        }

        self.get_one(&user.name).await
    }

    async fn delete(&self, name: &str) -> Result<(), DbError> {
        let mut tx = self.db.pool().begin().await?;

        // Dropping `tx` on an early return rolls back.
        let Some(row) =
            sqlx::query_as::<_, UserRow>(r"SELECT name, hash FROM user WHERE name = ?")
                .bind(name)
                .fetch_optional(&mut *tx)
                .await?
        else {
            return Err(DbError::missing::<User>(name));
        };

        sqlx::query(r"DELETE FROM user WHERE name = ?")
            .bind(name)
            .execute(&mut *tx)
            .await?;

        sqlx::query(r"INSERT OR REPLACE INTO xuser (name, hash) VALUES (?, ?)")
            .bind(&row.name)
            .bind(&row.hash)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(name, "Moved user to tombstone table");
        Ok(())
    }

    async fn random_name(&self) -> Result<Option<String>, DbError> {
        let name =
            sqlx::query_scalar::<_, String>(r"SELECT name FROM user ORDER BY random() LIMIT 1")
                .fetch_optional(self.db.pool())
                .await?;

        Ok(name)
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn get_tombstone(&self, name: &str) -> Result<User, DbError> {
        sqlx::query_as::<_, UserRow>(r"SELECT name, hash FROM xuser WHERE name = ?")
            .bind(name)
            .fetch_optional(self.db.pool())
            .await?
            .map(User::from)
            .ok_or_else(|| DbError::missing::<User>(name))
    }

    async fn get_tombstones(&self) -> Result<Vec<User>, DbError> {
        let rows = sqlx::query_as::<_, UserRow>(r"SELECT name, hash FROM xuser")
            .fetch_all(self.db.pool())
            .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }
}

/// A row from the `user` or `xuser` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    /// User name (primary key).
    pub name: String,
    /// Password hash.
    pub hash: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            name: row.name,
            hash: row.hash,
        }
    }
}
