//! Server configuration, read from command-line flags and environment.

use std::time::Duration;

use adminforge_core::KeyConfig;
use clap::{Parser, ValueEnum};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Top-level configuration of the schema server.
#[derive(Debug, Clone, Parser)]
#[command(name = "adminforge", about = "Serves admin resource schemas to the rendering client")]
pub struct ServerConfig {
    /// Bind address.
    #[arg(long, env = "ADMIN_HOST", default_value = "0.0.0.0")]
    pub host: String,
    /// Port to listen on. 0 means OS-assigned.
    #[arg(long, env = "ADMIN_PORT", default_value_t = 3000)]
    pub port: u16,
    /// Path prefix of the schema endpoints.
    #[arg(long, env = "ADMIN_ROUTE_PREFIX", default_value = "/api/admin")]
    pub route_prefix: String,
    /// Component key for fields with neither key nor name.
    #[arg(long, env = "ADMIN_DEFAULT_KEY")]
    pub default_key: Option<String>,
    /// Replace component keys by digests.
    #[arg(long, env = "ADMIN_CRYPT_KEYS")]
    pub crypt_keys: bool,
    /// Maximum time to wait for a request to complete, in seconds.
    #[arg(long, env = "ADMIN_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,
    /// Allowed CORS origins; `*` allows any.
    #[arg(long = "cors-origin", env = "ADMIN_CORS_ORIGINS", value_delimiter = ',', default_value = "*")]
    pub cors_origins: Vec<String>,
    #[arg(long, env = "ADMIN_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Key settings threaded into every resource definition.
    #[must_use]
    pub fn key_config(&self) -> KeyConfig {
        KeyConfig {
            default_key: self.default_key.clone(),
            crypt: self.crypt_keys,
        }
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 0,
            route_prefix: "/api/admin".to_string(),
            default_key: None,
            crypt_keys: false,
            request_timeout_secs: 30,
            cors_origins: vec!["*".to_string()],
            log_format: LogFormat::Pretty,
        }
    }
}
