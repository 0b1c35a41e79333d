//! Client configuration.
//!
//! Deployment details (where the identity service lives, how long to wait
//! for it) come from the environment; everything else in this crate is
//! compiled in. A `.env` file is honored when present so development setups
//! do not need exported variables.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Development default; deployments set `IDENTITY_API_URL`.
const DEFAULT_BASE_URL: &str = "http://localhost:4000/api";

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable overriding the identity service base URL
const ENV_BASE_URL: &str = "IDENTITY_API_URL";

/// Environment variable overriding the request timeout
const ENV_TIMEOUT_SECS: &str = "IDENTITY_API_TIMEOUT_SECS";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Build a config from the environment, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (silently ignore if not found)
        let _ = dotenvy::dotenv();

        let mut config = Self::default();
        if let Ok(url) = std::env::var(ENV_BASE_URL) {
            config.base_url = url;
        }
        if let Ok(raw) = std::env::var(ENV_TIMEOUT_SECS) {
            config.timeout_secs = raw
                .parse()
                .with_context(|| format!("invalid {ENV_TIMEOUT_SECS} value: {raw}"))?;
        }
        Ok(config)
    }
}
