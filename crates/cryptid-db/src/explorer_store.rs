//! Operations on the `explorer` table.

use async_trait::async_trait;
use cryptid_types::Explorer;

use crate::error::DbError;
use crate::repository::Repository;
use crate::sqlite::Database;

/// `SQLite`-backed explorer storage.
#[derive(Debug, Clone)]
pub struct ExplorerStore {
    db: Database,
}

impl ExplorerStore {
    /// Create a new explorer store bound to a connection pool.
    pub const fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Repository<Explorer> for ExplorerStore {
    async fn create(&self, explorer: &Explorer) -> Result<Explorer, DbError> {
        sqlx::query(r"INSERT INTO explorer (name, country, description) VALUES (?, ?, ?)")
            .bind(&explorer.name)
            .bind(&explorer.country)
            .bind(&explorer.description)
            .execute(self.db.pool())
            .await
            .map_err(|e| DbError::from_write::<Explorer>(e, &explorer.name))?;

        tracing::debug!(name = %explorer.name, "Inserted explorer");
        Ok(explorer.clone())
    }

    async fn get_one(&self, name: &str) -> Result<Explorer, DbError> {
        sqlx::query_as::<_, ExplorerRow>(
            r"SELECT name, country, description FROM explorer WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(self.db.pool())
        .await?
        .map(Explorer::from)
        .ok_or_else(|| DbError::missing::<Explorer>(name))
    }

    async fn get_all(&self) -> Result<Vec<Explorer>, DbError> {
        let rows =
            sqlx::query_as::<_, ExplorerRow>(r"SELECT name, country, description FROM explorer")
                .fetch_all(self.db.pool())
                .await?;

        Ok(rows.into_iter().map(Explorer::from).collect())
    }

    async fn modify(&self, name: &str, explorer: &Explorer) -> Result<Explorer, DbError> {
        let result = sqlx::query(
            r"UPDATE explorer SET name = ?, country = ?, description = ? WHERE name = ?",
        )
        .bind(&explorer.name)
        .bind(&explorer.country)
        .bind(&explorer.description)
        .bind(name)
        .execute(self.db.pool())
        .await
        .map_err(|e| DbError::from_write::<Explorer>(e, &explorer.name))?;

        if result.rows_affected() == 0 {
            return Err(DbError::missing::<Explorer>(name));
        }

        self.get_one(&explorer.name).await
    }

    async fn delete(&self, name: &str) -> Result<(), DbError> {
        let result = sqlx::query(r"DELETE FROM explorer WHERE name = ?")
            .bind(name)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::missing::<Explorer>(name));
        }
        Ok(())
    }

    async fn random_name(&self) -> Result<Option<String>, DbError> {
        let name = sqlx::query_scalar::<_, String>(
            r"SELECT name FROM explorer ORDER BY random() LIMIT 1",
        )
        .fetch_optional(self.db.pool())
        .await?;

        Ok(name)
    }
}

/// A row from the `explorer` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ExplorerRow {
    /// Explorer name (primary key).
    pub name: String,
    /// Home country.
    pub country: Option<String>,
    /// Biography.
    pub description: Option<String>,
}

impl From<ExplorerRow> for Explorer {
    fn from(row: ExplorerRow) -> Self {
        Self {
            name: row.name,
            country: row.country,
            description: row.description,
        }
    }
}
