//! Error types for the data layer.
//!
//! [`DbError::Missing`] and [`DbError::Duplicate`] are the two domain
//! signals every store reports. Everything else wraps the underlying
//! [`sqlx`] failure with the context of which operation failed.

use cryptid_types::Record;

/// Errors that can occur in the data layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// No row matched the requested primary key.
    #[error("{0}")]
    Missing(String),

    /// An insert or re-key collided with an existing primary key.
    #[error("{0}")]
    Duplicate(String),

    /// A `SQLite` operation failed.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] sqlx::Error),

    /// A `SQLite` migration failed.
    #[error("SQLite migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DbError {
    /// Build the "missing" signal for a record of kind `R`.
    pub fn missing<R: Record>(name: &str) -> Self {
        Self::Missing(format!("{} {name} not found", R::KIND))
    }

    /// Build the "duplicate" signal for a record of kind `R`.
    pub fn duplicate<R: Record>(name: &str) -> Self {
        Self::Duplicate(format!("{} {name} already exists", R::KIND))
    }

    /// Translate a failed write, turning a primary-key collision into
    /// [`DbError::Duplicate`].
    pub fn from_write<R: Record>(err: sqlx::Error, name: &str) -> Self {
        match err {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => Self::duplicate::<R>(name),
            other => Self::Sqlite(other),
        }
    }

    /// Whether this is the "missing" signal.
    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::Missing(_))
    }

    /// Whether this is the "duplicate" signal.
    pub const fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate(_))
    }
}

#[cfg(test)]
mod tests {
    use cryptid_types::{Creature, User};

    use super::*;

    #[test]
    fn messages_name_the_kind_and_key() {
        let missing = DbError::missing::<Creature>("Yeti");
        assert!(missing.is_missing());
        assert_eq!(missing.to_string(), "Creature Yeti not found");

        let duplicate = DbError::duplicate::<User>("admin");
        assert!(duplicate.is_duplicate());
        assert_eq!(duplicate.to_string(), "User admin already exists");
    }

    #[test]
    fn non_constraint_failures_stay_sqlite_errors() {
        let err = DbError::from_write::<Creature>(sqlx::Error::RowNotFound, "Yeti");
        assert!(matches!(err, DbError::Sqlite(_)));
    }
}
