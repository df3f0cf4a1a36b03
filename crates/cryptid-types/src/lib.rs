//! Shared record types for the Cryptid records service.
//!
//! This crate is the single source of truth for the records that flow
//! between the persistence, service, and HTTP layers. It has no I/O.
//!
//! # Modules
//!
//! - [`record`] -- The [`Record`] trait implemented by every stored type
//! - [`structs`] -- `Creature`, `Explorer`, `User`, and the `NewUser` request body

pub mod record;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use record::Record;
pub use structs::{Creature, Explorer, NewUser, User};
