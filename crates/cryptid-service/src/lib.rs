//! Service layer for the Cryptid records service.
//!
//! Creature and explorer operations are thin pass-throughs to the
//! injected [`Repository`](cryptid_db::Repository). The user service adds
//! authentication on top of its repository:
//!
//! - [`password`] -- argon2 hashing and verification
//! - [`token`] -- HS256 JWT issue and validation
//! - [`user`] -- current-user resolution, login, and user CRUD
//! - [`record`] -- generic pass-through for creatures and explorers
//! - [`error`] -- Shared error types

pub mod error;
pub mod password;
pub mod record;
pub mod token;
pub mod user;

// Re-export primary types for convenience.
pub use error::ServiceError;
pub use record::RecordService;
pub use token::{Claims, TokenIssuer, DEFAULT_TOKEN_TTL, LOGIN_TOKEN_TTL};
pub use user::{UserService, ADMIN_NAME};
