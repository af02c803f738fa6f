//! Environment configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_LISTEN: &str = "0.0.0.0:8080";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid CONSENT_LISTEN address {value:?}: {source}")]
    Listen {
        value: String,
        source: std::net::AddrParseError,
    },
}

/// Server settings read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// `CONSENT_LISTEN`, default [`DEFAULT_LISTEN`].
    pub listen: SocketAddr,
    /// `CONSENT_DB_PATH`. Unset or empty means the in-memory store.
    pub db_path: Option<PathBuf>,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let listen_raw = lookup("CONSENT_LISTEN").unwrap_or_else(|| DEFAULT_LISTEN.to_string());
        let listen = listen_raw
            .parse::<SocketAddr>()
            .map_err(|source| ConfigError::Listen {
                value: listen_raw.clone(),
                source,
            })?;
        let db_path = lookup("CONSENT_DB_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);
        Ok(Self { listen, db_path })
    }
}
