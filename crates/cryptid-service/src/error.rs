//! Error types for the service layer.

use cryptid_db::DbError;

/// Errors that can occur in the service layer.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The persistence layer failed or reported missing/duplicate.
    #[error(transparent)]
    Db(#[from] DbError),

    /// A password could not be hashed.
    #[error("password hash error: {0}")]
    PasswordHash(String),

    /// A token could not be signed.
    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}
