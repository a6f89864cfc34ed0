//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `STAYBNB_API_ORIGIN` - API origin (default: `http://localhost:3000`); `/api` is appended
//! - `STAYBNB_REQUEST_TIMEOUT_SECS` - Per-request timeout in seconds (default: 10)
//! - `STAYBNB_STORAGE_DIR` - Directory for durable client storage (default: `.staybnb`)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_ORIGIN: &str = "http://localhost:3000";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_STORAGE_DIR: &str = ".staybnb";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// StayBNB client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL, always ending in `/api` and never in `/`.
    api_base: String,
    /// Timeout applied to every request.
    pub request_timeout: Duration,
    /// Directory backing [`crate::FileStorage`].
    pub storage_dir: PathBuf,
}

impl ClientConfig {
    /// Build a configuration for the given API origin with default timeout
    /// and storage directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the origin is not an absolute
    /// http(s) URL.
    pub fn new(origin: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base: api_base_from_origin(origin)?,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let origin = get_env_or_default("STAYBNB_API_ORIGIN", DEFAULT_ORIGIN);
        let timeout_secs = get_env_or_default(
            "STAYBNB_REQUEST_TIMEOUT_SECS",
            &DEFAULT_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("STAYBNB_REQUEST_TIMEOUT_SECS".to_string(), e.to_string())
        })?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "STAYBNB_REQUEST_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        Ok(Self::new(&origin)?
            .with_timeout(Duration::from_secs(timeout_secs))
            .with_storage_dir(get_env_or_default("STAYBNB_STORAGE_DIR", DEFAULT_STORAGE_DIR)))
    }

    /// Override the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Override the storage directory.
    #[must_use]
    pub fn with_storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = dir.into();
        self
    }

    /// API base URL, e.g. `http://localhost:3000/api`.
    #[must_use]
    pub fn api_base(&self) -> &str {
        &self.api_base
    }
}

fn api_base_from_origin(origin: &str) -> Result<String, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar("STAYBNB_API_ORIGIN".to_string(), reason);

    let url = Url::parse(origin.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {}", url.scheme())));
    }

    let base = url.as_str().trim_end_matches('/');
    if base.ends_with("/api") {
        Ok(base.to_owned())
    } else {
        Ok(format!("{base}/api"))
    }
}

fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
