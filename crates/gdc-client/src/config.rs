//! Configuration management for the GDC client
//!
//! Server endpoints, credentials and integration polling settings.

use crate::api::client::DEFAULT_API_TIMEOUT_SECS;
use crate::error::{GdcError, Result};
use gdc_common::env::{env_opt, env_or};
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ============================================================================
// Configuration Constants
// ============================================================================

/// Default platform API URL when not specified via environment variable.
pub const DEFAULT_SERVER_URL: &str = "https://secure.gooddata.com";

/// Default WebDAV staging URL when not specified via environment variable.
pub const DEFAULT_STAGING_URL: &str = "https://secure-di.gooddata.com";

/// Delay between two integration status checks.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// What schema execution does with a transport failure.
///
/// `Swallow` reports the failure as "no objects created" (`Ok(false)`).
/// `Propagate` returns the transport error like every other operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SchemaErrorPolicy {
    #[default]
    Swallow,
    Propagate,
}

impl std::str::FromStr for SchemaErrorPolicy {
    type Err = GdcError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "swallow" | "ignore" => Ok(SchemaErrorPolicy::Swallow),
            "propagate" | "fail" => Ok(SchemaErrorPolicy::Propagate),
            _ => Err(GdcError::config(format!(
                "invalid schema error policy '{}', expected swallow or propagate",
                s
            ))),
        }
    }
}

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Platform API URL
    pub server_url: String,

    /// WebDAV staging URL
    pub staging_url: String,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default, skip_serializing)]
    pub password: Option<String>,

    /// Per-request timeout
    pub api_timeout_secs: u64,

    /// Delay between integration status checks
    pub poll_interval_ms: u64,

    /// Upper bound on waiting for an integration task; unbounded when absent
    #[serde(default)]
    pub integration_timeout_secs: Option<u64>,

    #[serde(default)]
    pub schema_errors: SchemaErrorPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            staging_url: DEFAULT_STAGING_URL.to_string(),
            username: None,
            password: None,
            api_timeout_secs: DEFAULT_API_TIMEOUT_SECS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            integration_timeout_secs: None,
            schema_errors: SchemaErrorPolicy::Swallow,
        }
    }
}

impl ClientConfig {
    /// Load config from environment variables
    ///
    /// - `GDC_SERVER_URL`, `GDC_STAGING_URL`
    /// - `GDC_USERNAME`, `GDC_PASSWORD`
    /// - `GDC_API_TIMEOUT_SECS`, `GDC_POLL_INTERVAL_MS`, `GDC_INTEGRATION_TIMEOUT_SECS`
    /// - `GDC_SCHEMA_ERRORS` (`swallow` or `propagate`)
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            server_url: env_or("GDC_SERVER_URL", defaults.server_url)?,
            staging_url: env_or("GDC_STAGING_URL", defaults.staging_url)?,
            username: env_opt("GDC_USERNAME")?,
            password: env_opt("GDC_PASSWORD")?,
            api_timeout_secs: env_or("GDC_API_TIMEOUT_SECS", defaults.api_timeout_secs)?,
            poll_interval_ms: env_or("GDC_POLL_INTERVAL_MS", defaults.poll_interval_ms)?,
            integration_timeout_secs: env_opt("GDC_INTEGRATION_TIMEOUT_SECS")?,
            schema_errors: match std::env::var("GDC_SCHEMA_ERRORS") {
                Ok(raw) => raw.parse()?,
                Err(_) => defaults.schema_errors,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make the client unusable
    pub fn validate(&self) -> Result<()> {
        if self.server_url.trim().is_empty() {
            return Err(GdcError::config("server URL must not be empty"));
        }
        if self.staging_url.trim().is_empty() {
            return Err(GdcError::config("staging URL must not be empty"));
        }
        if self.poll_interval_ms == 0 {
            return Err(GdcError::config("poll interval must be greater than zero"));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn integration_timeout(&self) -> Option<Duration> {
        self.integration_timeout_secs.map(Duration::from_secs)
    }
}
