//! Error types for the server binary.
//!
//! [`ServerError`] is the top-level error type that wraps every failure
//! mode during startup, serving, and shutdown.

use crate::config::ConfigError;

/// Top-level error for the server binary.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// Opening or migrating the database failed.
    #[error("database error: {source}")]
    Database {
        /// The underlying database error.
        #[from]
        source: cryptid_db::DbError,
    },

    /// The HTTP server failed to bind or serve.
    #[error("http error: {source}")]
    Http {
        /// The underlying server error.
        #[from]
        source: cryptid_web::ServerError,
    },
}
