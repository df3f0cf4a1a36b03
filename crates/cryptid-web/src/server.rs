//! Listener lifecycle for the Cryptid API.
//!
//! [`start_server`] owns the socket from bind to drain. The caller hands
//! in the shutdown trigger (Ctrl-C in the binary, an already-resolved
//! future in tests) and gets control back once open connections finish.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::router::build_router;
use crate::state::AppState;

/// Where the API listens. Defaults to `0.0.0.0:8000`.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to listen on, as an IP literal.
    pub host: String,
    /// Port to listen on; `0` asks the OS for a free one.
    pub port: u16,
}

impl ServerConfig {
    /// Parse `host:port` into a socket address.
    fn socket_addr(&self) -> Result<SocketAddr, ServerError> {
        let text = format!("{}:{}", self.host, self.port);
        text.parse()
            .map_err(|e| ServerError::Bind(format!("cannot listen on {text}: {e}")))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("0.0.0.0"),
            port: 8000,
        }
    }
}

/// Serve the API on `config`'s address until `shutdown` resolves.
///
/// Once `shutdown` fires, no new connections are accepted and the call
/// returns after in-flight requests have been answered.
pub async fn start_server<F>(
    config: &ServerConfig,
    state: Arc<AppState>,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Bind(format!("cannot listen on {addr}: {e}")))?;
    let local = listener.local_addr().unwrap_or(addr);
    tracing::info!(addr = %local, "Accepting API requests");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| ServerError::Serve(e.to_string()))?;

    tracing::info!(addr = %local, "API listener drained");
    Ok(())
}

/// Failures of the API listener.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The address was malformed or could not be bound.
    #[error("bind error: {0}")]
    Bind(String),

    /// Accepting or answering connections failed.
    #[error("serve error: {0}")]
    Serve(String),
}

#[cfg(test)]
mod tests {
    use cryptid_service::TokenIssuer;

    use super::*;

    #[test]
    fn default_listens_on_port_8000() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8000);
    }

    #[tokio::test]
    async fn invalid_host_is_a_bind_error() {
        let config = ServerConfig {
            host: String::from("not a host"),
            port: 8000,
        };
        let state = Arc::new(AppState::in_memory(TokenIssuer::new(b"secret")));
        let result = start_server(&config, state, async {}).await;
        assert!(matches!(result, Err(ServerError::Bind(_))));
    }

    #[tokio::test]
    async fn stops_when_shutdown_resolves() {
        let config = ServerConfig {
            host: String::from("127.0.0.1"),
            port: 0,
        };
        let state = Arc::new(AppState::in_memory(TokenIssuer::new(b"secret")));
        let result = start_server(&config, state, async {}).await;
        assert!(result.is_ok());
    }
}
