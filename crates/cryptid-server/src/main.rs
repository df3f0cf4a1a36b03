//! Process entry point for the Cryptid records service.
//!
//! Loads configuration, wires the chosen storage backend into the
//! services, and serves the HTTP API until Ctrl-C.
//!
//! # Startup
//!
//! ```text
//! cryptid-config.yaml + CRYPTID_* env --> backend (sqlite | memory) --> AppState --> axum
//! ```

mod config;
mod error;

use std::path::Path;
use std::sync::Arc;

use cryptid_db::{CreatureStore, Database, ExplorerStore, UserStore};
use cryptid_service::TokenIssuer;
use cryptid_web::AppState;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{AuthSection, Backend, DatabaseSection, ServiceConfig};
use crate::error::ServerError;

/// Configuration file looked up in the working directory.
const CONFIG_PATH: &str = "cryptid-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, database setup, or serving fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration (before logging, which reads its level).
    let (config, from_file) = load_config(Path::new(CONFIG_PATH))?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("cryptid-server starting");
    if !from_file {
        info!("Config file not found, using defaults");
    }
    info!(
        host = config.server.host,
        port = config.server.port,
        backend = ?config.database.backend,
        database_path = %config.database.path.display(),
        "Configuration loaded"
    );

    // 3. Wire the storage backend into the services.
    let tokens = token_issuer(&config.auth);
    let (state, database) = build_state(&config.database, tokens).await?;

    // 4. Serve until Ctrl-C.
    let served = cryptid_web::start_server(
        &config.server.to_server_config(),
        Arc::new(state),
        shutdown_signal(),
    )
    .await
    .map_err(ServerError::from);

    // 5. Release the pool even when serving failed.
    if let Some(database) = database {
        database.close().await;
    }
    served?;

    info!("cryptid-server shutdown complete");
    Ok(())
}

/// Load `path` if it exists, otherwise defaults, then apply env overrides.
///
/// The flag is `true` when the file was read.
fn load_config(path: &Path) -> Result<(ServiceConfig, bool), ServerError> {
    let (mut config, from_file) = if path.exists() {
        (ServiceConfig::from_file(path)?, true)
    } else {
        (ServiceConfig::default(), false)
    };
    config.apply_env_overrides()?;
    Ok((config, from_file))
}

/// Build the token issuer from the configured secret.
fn token_issuer(auth: &AuthSection) -> TokenIssuer {
    match auth.jwt_secret.as_deref().filter(|secret| !secret.is_empty()) {
        Some(secret) => TokenIssuer::new(secret.as_bytes()),
        None => {
            warn!("No JWT secret configured, using a random one; sessions end on restart");
            TokenIssuer::random()
        }
    }
}

/// Build the application state over the configured backend.
///
/// Returns the open database alongside the state so it can be closed on
/// shutdown. The memory backend has none.
async fn build_state(
    section: &DatabaseSection,
    tokens: TokenIssuer,
) -> Result<(AppState, Option<Database>), ServerError> {
    match section.backend {
        Backend::Memory => {
            info!("Using in-memory storage; records are lost on exit");
            Ok((AppState::in_memory(tokens), None))
        }
        Backend::Sqlite => {
            let database = Database::connect(&section.to_database_config()).await?;
            database.run_migrations().await?;
            let state = AppState::new(
                Arc::new(CreatureStore::new(database.clone())),
                Arc::new(ExplorerStore::new(database.clone())),
                Arc::new(UserStore::new(database.clone())),
                tokens,
            );
            Ok((state, Some(database)))
        }
    }
}

/// Resolve on Ctrl-C. Never resolves if the signal cannot be installed.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            warn!(error = %e, "Failed to listen for Ctrl-C, running until killed");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use cryptid_types::Creature;

    use super::*;

    #[test]
    fn missing_config_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (config, from_file) = load_config(&dir.path().join(CONFIG_PATH)).unwrap();
        assert!(!from_file);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn present_config_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_PATH);
        std::fs::write(&path, "logging:\n  level: debug\n").unwrap();
        let (config, from_file) = load_config(&path).unwrap();
        assert!(from_file);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn configured_secret_is_used() {
        let auth = AuthSection {
            jwt_secret: Some(String::from("shared")),
        };
        let token = token_issuer(&auth).issue("alice", None).unwrap();
        assert_eq!(
            TokenIssuer::new(b"shared").validate(&token).as_deref(),
            Some("alice")
        );
    }

    #[test]
    fn empty_secret_falls_back_to_random() {
        let auth = AuthSection {
            jwt_secret: Some(String::new()),
        };
        let token = token_issuer(&auth).issue("alice", None).unwrap();
        assert!(TokenIssuer::new(b"").validate(&token).is_none());
    }

    #[tokio::test]
    async fn memory_backend_has_no_database() {
        let section = DatabaseSection {
            backend: Backend::Memory,
            ..DatabaseSection::default()
        };
        let (state, database) = build_state(&section, TokenIssuer::new(b"k")).await.unwrap();
        assert!(database.is_none());
        state.creatures.create(&Creature::named("Yeti")).await.unwrap();
        assert_eq!(state.creatures.get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn sqlite_backend_persists_across_states() {
        let dir = tempfile::tempdir().unwrap();
        let section = DatabaseSection {
            path: dir.path().join("cryptid.db"),
            ..DatabaseSection::default()
        };

        let (state, database) = build_state(&section, TokenIssuer::new(b"k")).await.unwrap();
        state.creatures.create(&Creature::named("Yeti")).await.unwrap();
        database.unwrap().close().await;

        let (state, database) = build_state(&section, TokenIssuer::new(b"k")).await.unwrap();
        let yeti = state.creatures.get_one("Yeti").await.unwrap();
        assert_eq!(yeti, Creature::named("Yeti"));
        database.unwrap().close().await;
    }
}
