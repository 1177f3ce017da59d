//! Environment configuration
//!
//! Values come from the process environment, after `.env` has been loaded by
//! the binary. Command-line flags override them.

use anyhow::Context;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

pub const API_URL_VAR: &str = "SIGN_API_URL";
pub const TIMEOUT_VAR: &str = "SIGN_API_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    /// Base URL of the signing service, without trailing slash
    pub api_url: String,
    pub timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(API_URL_VAR).filter(|v| !v.trim().is_empty()) {
            config.api_url = trim_url(&url);
        }

        if let Some(secs) = lookup(TIMEOUT_VAR).filter(|v| !v.trim().is_empty()) {
            let secs: u64 = secs
                .trim()
                .parse()
                .with_context(|| format!("{} must be a whole number of seconds", TIMEOUT_VAR))?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Apply command-line overrides
    pub fn with_overrides(mut self, api_url: Option<&str>, timeout_secs: Option<u64>) -> Self {
        if let Some(url) = api_url {
            self.api_url = trim_url(url);
        }
        if let Some(secs) = timeout_secs {
            self.timeout = Duration::from_secs(secs);
        }
        self
    }
}

fn trim_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
