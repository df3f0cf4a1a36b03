//! Configuration loading and typed config structures for the server.
//!
//! The configuration lives in `cryptid-config.yaml` in the working
//! directory. Every field has a default, so a missing file or a partial
//! file is fine. Environment variables are applied on top of the file:
//!
//! - `CRYPTID_HOST` overrides `server.host`
//! - `CRYPTID_PORT` overrides `server.port`
//! - `CRYPTID_BACKEND` overrides `database.backend`
//! - `CRYPTID_DATABASE_PATH` overrides `database.path`
//! - `CRYPTID_JWT_SECRET` overrides `auth.jwt_secret`

use std::path::{Path, PathBuf};
use std::time::Duration;

use cryptid_db::DatabaseConfig;
use cryptid_web::ServerConfig;
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// An environment override held an unusable value.
    #[error("invalid value {value:?} for {key}")]
    InvalidOverride {
        /// Name of the environment variable.
        key: &'static str,
        /// The rejected value.
        value: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level service configuration.
///
/// Mirrors the structure of `cryptid-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ServiceConfig {
    /// HTTP listen address.
    #[serde(default)]
    pub server: ServerSection,

    /// Storage backend and `SQLite` pool settings.
    #[serde(default)]
    pub database: DatabaseSection,

    /// Token signing settings.
    #[serde(default)]
    pub auth: AuthSection,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSection,
}

impl ServiceConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Apply the `CRYPTID_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOverride`] if `CRYPTID_PORT` or
    /// `CRYPTID_BACKEND` cannot be parsed.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub(crate) fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("CRYPTID_HOST") {
            self.server.host = val;
        }
        if let Some(val) = lookup("CRYPTID_PORT") {
            self.server.port =
                val.parse().ok().ok_or_else(move || ConfigError::InvalidOverride {
                    key: "CRYPTID_PORT",
                    value: val,
                })?;
        }
        if let Some(val) = lookup("CRYPTID_BACKEND") {
            self.database.backend =
                Backend::from_name(&val).ok_or_else(move || ConfigError::InvalidOverride {
                    key: "CRYPTID_BACKEND",
                    value: val,
                })?;
        }
        if let Some(val) = lookup("CRYPTID_DATABASE_PATH") {
            self.database.path = PathBuf::from(val);
        }
        if let Some(val) = lookup("CRYPTID_JWT_SECRET") {
            self.auth.jwt_secret = Some(val);
        }
        Ok(())
    }
}

/// HTTP listen address.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSection {
    /// Host to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerSection {
    /// The web crate's view of this section.
    pub fn to_server_config(&self) -> ServerConfig {
        ServerConfig {
            host: self.host.clone(),
            port: self.port,
        }
    }
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Which storage backend the repositories use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// One `SQLite` file on disk.
    #[default]
    Sqlite,
    /// Process-local vectors; lost on exit.
    Memory,
}

impl Backend {
    /// Parse a backend name, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Some(Self::Sqlite),
            "memory" => Some(Self::Memory),
            _ => None,
        }
    }
}

/// Storage settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatabaseSection {
    /// Backend selection.
    #[serde(default)]
    pub backend: Backend,

    /// Path of the `SQLite` file.
    #[serde(default = "default_database_path")]
    pub path: PathBuf,

    /// Maximum pool connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// How long a statement waits on a locked database, in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl DatabaseSection {
    /// The pool configuration for this section.
    pub fn to_database_config(&self) -> DatabaseConfig {
        DatabaseConfig::new(&self.path)
            .with_max_connections(self.max_connections)
            .with_busy_timeout(Duration::from_millis(self.busy_timeout_ms))
    }
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            path: default_database_path(),
            max_connections: default_max_connections(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

/// Token signing settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AuthSection {
    /// HS256 signing secret. A random one is generated when absent.
    #[serde(default)]
    pub jwt_secret: Option<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingSection {
    /// Filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    String::from("0.0.0.0")
}

const fn default_port() -> u16 {
    8000
}

fn default_database_path() -> PathBuf {
    PathBuf::from("cryptid.db")
}

const fn default_max_connections() -> u32 {
    5
}

const fn default_busy_timeout_ms() -> u64 {
    5000
}

fn default_log_level() -> String {
    String::from("info")
}
