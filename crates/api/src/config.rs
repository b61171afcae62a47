use std::fmt::Display;
use std::str::FromStr;

use clinica_core::imaging::DEFAULT_MAX_DIMENSION;
use clinica_storage::StorageConfig;

use crate::auth::jwt::JwtConfig;

/// 10 MiB, enough for a phone photo before re-encoding.
const DEFAULT_UPLOAD_MAX_BYTES: usize = 10 * 1024 * 1024;

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed to call the API from a browser (the site and the admin panel).
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    /// Time allowed for background tasks to stop after the listener closes.
    pub shutdown_timeout_secs: u64,
    /// How long a content snapshot is served before it is reloaded.
    pub content_cache_ttl_secs: u64,
    /// Maximum request body size, sized for image uploads.
    pub upload_max_bytes: usize,
    /// Longest side of a re-encoded image, in pixels.
    pub upload_max_dimension: u32,
    pub jwt: JwtConfig,
    pub storage: StorageConfig,
}

/// Parse `name` from the environment, falling back to `default` when unset.
///
/// Panics on a value that does not parse; bad configuration should stop the
/// process before it binds.
fn env_or<T>(name: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{name}='{raw}' is invalid: {e}")),
        Err(_) => default,
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                    |
    /// |--------------------------|----------------------------|
    /// | `HOST`                   | `0.0.0.0`                  |
    /// | `PORT`                   | `3000`                     |
    /// | `CORS_ORIGINS`           | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`  | `30`                       |
    /// | `CONTENT_CACHE_TTL_SECS` | `300`                      |
    /// | `UPLOAD_MAX_BYTES`       | `10485760`                 |
    /// | `UPLOAD_MAX_DIMENSION`   | `1600`                     |
    ///
    /// JWT and storage settings are read by [`JwtConfig::from_env`] and
    /// [`StorageConfig::from_env`].
    pub fn from_env() -> Self {
        let cors_origins = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        Self {
            host: env_or("HOST", "0.0.0.0".to_string()),
            port: env_or("PORT", 3000),
            cors_origins,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            shutdown_timeout_secs: env_or("SHUTDOWN_TIMEOUT_SECS", 30),
            content_cache_ttl_secs: env_or("CONTENT_CACHE_TTL_SECS", 300),
            upload_max_bytes: env_or("UPLOAD_MAX_BYTES", DEFAULT_UPLOAD_MAX_BYTES),
            upload_max_dimension: env_or("UPLOAD_MAX_DIMENSION", DEFAULT_MAX_DIMENSION),
            jwt: JwtConfig::from_env(),
            storage: StorageConfig::from_env(),
        }
    }
}
