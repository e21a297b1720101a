//! Server configuration from environment variables.

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use restoa_store::StoreConfig;

/// Default port, kept from the original annotation server.
pub const DEFAULT_PORT: u16 = 47111;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Directory holding the `.txt`/`.ann` document pairs.
    pub data_dir: PathBuf,
    /// Address to bind.
    pub host: IpAddr,
    /// Server port to listen on.
    pub port: u16,
    /// Base URL used in projected ids and targets instead of the request's
    /// `Host` header, e.g. when running behind a proxy.
    pub public_url: Option<String>,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// CORS allowed origins (comma-separated or "*" for all).
    pub cors_allowed_origins: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            public_url: None,
            log_level: "info".to_string(),
            cors_allowed_origins: "*".to_string(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `RESTOA_DATA_DIR`: Data directory (default: "data")
    /// - `RESTOA_HOST`: Bind address (default: 127.0.0.1)
    /// - `RESTOA_PORT`: Server port (default: 47111)
    /// - `RESTOA_PUBLIC_URL`: Base URL override for projected nodes
    /// - `LOG_LEVEL`: Logging level (default: "info")
    /// - `CORS_ALLOWED_ORIGINS`: Allowed CORS origins (default: "*")
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let data_dir = env::var("RESTOA_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let host = match env::var("RESTOA_HOST") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                name: "RESTOA_HOST".to_string(),
                reason: format!("{raw:?} is not an IP address"),
            })?,
            Err(_) => defaults.host,
        };

        let port = match env::var("RESTOA_PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                name: "RESTOA_PORT".to_string(),
                reason: format!("{raw:?} is not a port number"),
            })?,
            Err(_) => defaults.port,
        };

        let public_url = env::var("RESTOA_PUBLIC_URL")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let log_level = env::var("LOG_LEVEL").unwrap_or(defaults.log_level);

        let cors_allowed_origins =
            env::var("CORS_ALLOWED_ORIGINS").unwrap_or(defaults.cors_allowed_origins);

        Ok(Self {
            data_dir,
            host,
            port,
            public_url,
            log_level,
            cors_allowed_origins,
        })
    }

    /// Get the socket address for the server.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Store configuration derived from this one.
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            data_dir: self.data_dir.clone(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Invalid environment variable value.
    #[error("invalid value for environment variable {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}
