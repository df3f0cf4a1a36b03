//! Shared application state for the HTTP server.
//!
//! [`AppState`] holds one service per resource. The storage backend behind
//! each service is chosen by whoever builds the state.

use std::sync::Arc;

use cryptid_db::{MemoryStore, MemoryUserStore, Repository, UserRepository};
use cryptid_service::{RecordService, TokenIssuer, UserService};
use cryptid_types::{Creature, Explorer};

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Creature operations.
    pub creatures: RecordService<Creature>,
    /// Explorer operations.
    pub explorers: RecordService<Explorer>,
    /// User operations and authentication.
    pub users: UserService,
}

impl AppState {
    /// Create state over the given repositories and token issuer.
    pub fn new(
        creatures: Arc<dyn Repository<Creature>>,
        explorers: Arc<dyn Repository<Explorer>>,
        users: Arc<dyn UserRepository>,
        tokens: TokenIssuer,
    ) -> Self {
        Self {
            creatures: RecordService::new(creatures),
            explorers: RecordService::new(explorers),
            users: UserService::new(users, tokens),
        }
    }

    /// Create state backed entirely by empty in-memory stores.
    pub fn in_memory(tokens: TokenIssuer) -> Self {
        Self::new(
            Arc::new(MemoryStore::<Creature>::new()),
            Arc::new(MemoryStore::<Explorer>::new()),
            Arc::new(MemoryUserStore::new()),
            tokens,
        )
    }
}
