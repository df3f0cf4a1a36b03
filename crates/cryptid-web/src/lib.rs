//! HTTP API server for the Cryptid records service.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **Creature endpoints** (`/creature`) -- open CRUD
//! - **Explorer endpoints** (`/explorer`) -- open CRUD
//! - **User endpoints** (`/user`) -- account CRUD gated on the session
//!   cookie, plus login, logout, and "who am I"
//!
//! # Architecture
//!
//! Handlers translate requests into calls on the services held in
//! [`AppState`]. Service failures become [`ApiError`]s, which map the
//! persistence layer's "missing" and "duplicate" signals to 404 and 409.
//! The session token travels in the `access_token` cookie and is resolved
//! to a user by the [`CurrentUser`] extractor.
//!
//! [`CurrentUser`]: session::CurrentUser
//! [`ApiError`]: error::ApiError

pub mod error;
pub mod extract;
pub mod handlers;
pub mod router;
pub mod server;
pub mod session;
pub mod state;
pub mod users;

// Re-export primary types for convenience.
pub use router::build_router;
pub use server::{start_server, ServerConfig, ServerError};
pub use state::AppState;
