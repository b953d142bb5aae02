//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `FARMSTAND_ENDPOINT` - URL of the spreadsheet web-app endpoint used for
//!   both catalog retrieval and order submission
//!
//! ## Optional
//! - `FARMSTAND_HTTP_TIMEOUT_SECS` - Per-request timeout in seconds
//!   (default: 10)

use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
///
/// The backend endpoint is an explicit injected value rather than a
/// module-level constant, so tests and alternate deployments can point the
/// pipeline anywhere.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Spreadsheet web-app endpoint.
    pub endpoint: Url,
    /// Bound applied to every backend request. A request that exceeds it
    /// resolves through the normal degradation paths instead of hanging.
    pub request_timeout: Duration,
}

impl StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let endpoint = get_required_env("FARMSTAND_ENDPOINT")?;
        let endpoint = Url::parse(&endpoint).map_err(|e| {
            ConfigError::InvalidEnvVar("FARMSTAND_ENDPOINT".to_string(), e.to_string())
        })?;

        let timeout_secs = match std::env::var("FARMSTAND_HTTP_TIMEOUT_SECS") {
            Ok(value) => value.parse::<u64>().map_err(|e| {
                ConfigError::InvalidEnvVar("FARMSTAND_HTTP_TIMEOUT_SECS".to_string(), e.to_string())
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            endpoint,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Configuration pointing at an explicit endpoint, with defaults for
    /// everything else.
    #[must_use]
    pub const fn for_endpoint(endpoint: Url) -> Self {
        Self {
            endpoint,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}
