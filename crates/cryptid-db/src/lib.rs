//! Data layer (SQLite) for the Cryptid records service.
//!
//! Every record type is reached through a capability trait
//! ([`Repository`], plus [`UserRepository`] for users) so the entry point
//! can inject either the SQLite stores or the in-memory stores without
//! the layers above knowing which one is live.
//!
//! # Architecture
//!
//! ```text
//! RecordService / UserService
//!     |
//!     +-- Arc<dyn Repository<T>> ----+--> CreatureStore / ExplorerStore / UserStore
//!                                    |        (Database: SqlitePool + migrations)
//!                                    +--> MemoryStore<T> / MemoryUserStore
//! ```
//!
//! # Modules
//!
//! - [`sqlite`] -- `SQLite` connection pool and configuration
//! - [`repository`] -- Capability traits shared by every backend
//! - [`creature_store`] -- `creature` table operations
//! - [`explorer_store`] -- `explorer` table operations
//! - [`user_store`] -- `user` and `xuser` (tombstone) table operations
//! - [`memory`] -- In-memory backend for tests and local runs
//! - [`error`] -- Shared error types

pub mod creature_store;
pub mod error;
pub mod explorer_store;
pub mod memory;
pub mod repository;
pub mod sqlite;
pub mod user_store;

// Re-export primary types for convenience.
pub use creature_store::{CreatureRow, CreatureStore};
pub use error::DbError;
pub use explorer_store::{ExplorerRow, ExplorerStore};
pub use memory::{MemoryStore, MemoryUserStore};
pub use repository::{Repository, UserRepository};
pub use sqlite::{Database, DatabaseConfig};
pub use user_store::{UserRow, UserStore};
