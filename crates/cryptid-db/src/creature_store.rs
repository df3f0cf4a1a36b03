//! Operations on the `creature` table.

use async_trait::async_trait;
use cryptid_types::Creature;

use crate::error::DbError;
use crate::repository::Repository;
use crate::sqlite::Database;

/// `SQLite`-backed creature storage.
#[derive(Debug, Clone)]
pub struct CreatureStore {
    db: Database,
}

impl CreatureStore {
    /// Create a new creature store bound to a connection pool.
    pub const fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Repository<Creature> for CreatureStore {
    async fn create(&self, creature: &Creature) -> Result<Creature, DbError> {
        sqlx::query(
            r"INSERT INTO creature (name, country, area, description, aka)
              VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&creature.name)
        .bind(&creature.country)
        .bind(&creature.area)
        .bind(&creature.description)
        .bind(&creature.aka)
        .execute(self.db.pool())
        .await
        .map_err(|e| DbError::from_write::<Creature>(e, &creature.name))?;

        tracing::debug!(name = %creature.name, "Inserted creature");
        Ok(creature.clone())
    }

    async fn get_one(&self, name: &str) -> Result<Creature, DbError> {
        sqlx::query_as::<_, CreatureRow>(
            r"SELECT name, country, area, description, aka
              FROM creature
              WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(self.db.pool())
        .await?
        .map(Creature::from)
        .ok_or_else(|| DbError::missing::<Creature>(name))
    }

    async fn get_all(&self) -> Result<Vec<Creature>, DbError> {
        let rows = sqlx::query_as::<_, CreatureRow>(
            r"SELECT name, country, area, description, aka FROM creature",
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.into_iter().map(Creature::from).collect())
    }

    async fn modify(&self, name: &str, creature: &Creature) -> Result<Creature, DbError> {
        let result = sqlx::query(
            r"UPDATE creature
              SET name = ?, country = ?, area = ?, description = ?, aka = ?
              WHERE name = ?",
        )
        .bind(&creature.name)
        .bind(&creature.country)
        .bind(&creature.area)
        .bind(&creature.description)
        .bind(&creature.aka)
        .bind(name)
        .execute(self.db.pool())
        .await
        .map_err(|e| DbError::from_write::<Creature>(e, &creature.name))?;

        if result.rows_affected() == 0 {
            return Err(DbError::missing::<Creature>(name));
        }

        self.get_one(&creature.name).await
    }

    async fn delete(&self, name: &str) -> Result<(), DbError> {
        let result = sqlx::query(r"DELETE FROM creature WHERE name = ?")
            .bind(name)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::missing::<Creature>(name));
        }
        Ok(())
    }

    async fn random_name(&self) -> Result<Option<String>, DbError> {
        let name = sqlx::query_scalar::<_, String>(
            r"SELECT name FROM creature ORDER BY random() LIMIT 1",
        )
        .fetch_optional(self.db.pool())
        .await?;

        Ok(name)
    }
}

/// A row from the `creature` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CreatureRow {
    /// Creature name (primary key).
    pub name: String,
    /// Country.
    pub country: Option<String>,
    /// Area within the country.
    pub area: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Alternative names.
    pub aka: Option<String>,
}

impl From<CreatureRow> for Creature {
    fn from(row: CreatureRow) -> Self {
        Self {
            name: row.name,
            country: row.country,
            area: row.area,
            description: row.description,
            aka: row.aka,
        }
    }
}
