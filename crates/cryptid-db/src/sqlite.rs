//! `SQLite` connection pool and configuration.
//!
//! `SQLite` holds every table of the service in one local file. The pool is
//! opened once at process start, cloned into each store, and closed on
//! shutdown. Concurrent writers are serialized by `SQLite`'s own locking;
//! a writer that waits longer than the busy timeout fails with
//! [`DbError::Sqlite`].
//!
//! Uses [`sqlx`] with runtime query construction (not compile-time checked)
//! to avoid requiring a live database at build time. All queries are
//! parameterized to prevent SQL injection.

use std::path::{Path, PathBuf};
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::error::DbError;

/// Default maximum number of connections in the pool.
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Default time a statement waits on a locked database, in milliseconds.
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;

/// Default pool acquire timeout in seconds.
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;

/// Configuration for the `SQLite` connection pool.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Path of the database file.
    pub path: PathBuf,
    /// Maximum number of connections in the pool.
    pub max_connections: u32,
    /// How long a statement waits on a locked database.
    pub busy_timeout: Duration,
    /// Pool acquire timeout.
    pub acquire_timeout: Duration,
    /// Create the file if it does not exist.
    pub create_if_missing: bool,
}

impl DatabaseConfig {
    /// Create a new configuration for the database file at `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            busy_timeout: Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS),
            acquire_timeout: Duration::from_secs(DEFAULT_ACQUIRE_TIMEOUT_SECS),
            create_if_missing: true,
        }
    }

    /// Set the maximum number of connections.
    #[must_use]
    pub const fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Set the busy timeout.
    #[must_use]
    pub const fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Set whether a missing database file is created.
    #[must_use]
    pub const fn with_create_if_missing(mut self, create: bool) -> Self {
        self.create_if_missing = create;
        self
    }
}

/// Connection pool handle to `SQLite`.
///
/// Cheap to clone; every store holds its own clone.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open the database using the provided configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Config`] if `max_connections` is zero.
    /// Returns [`DbError::Sqlite`] if the file cannot be opened.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DbError> {
        if config.max_connections == 0 {
            return Err(DbError::Config(
                "max_connections must be at least 1".to_owned(),
            ));
        }

        let connect_options = SqliteConnectOptions::new()
            .filename(&config.path)
            .create_if_missing(config.create_if_missing)
            .busy_timeout(config.busy_timeout);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_with(connect_options)
            .await?;

        tracing::info!(
            path = %config.path.display(),
            max_connections = config.max_connections,
            "Opened SQLite database"
        );

        Ok(Self { pool })
    }

    /// Open the database file at `path` with default pool settings.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the file cannot be opened.
    pub async fn connect_path(path: impl AsRef<Path>) -> Result<Self, DbError> {
        let config = DatabaseConfig::new(path);
        Self::connect(&config).await
    }

    /// Create any missing tables by running the embedded migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Migration`] if any migration fails.
    pub async fn run_migrations(&self) -> Result<(), DbError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("Database migrations completed");
        Ok(())
    }

    /// Return a reference to the underlying [`SqlitePool`].
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close all connections in the pool gracefully.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("SQLite pool closed");
    }
}
