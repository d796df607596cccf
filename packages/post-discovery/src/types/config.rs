//! Configuration types for fetching and verification.

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::error::ConfigError;

/// Configuration for original post discovery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Timeout for each individual fetch.
    ///
    /// Default: 10 seconds.
    pub fetch_timeout: Duration,

    /// Ceiling on the whole fallback syndication scan.
    ///
    /// Default: 30 seconds.
    pub scan_timeout: Duration,

    /// Maximum syndication links resolved at once during the fallback scan.
    ///
    /// A page may declare arbitrarily many syndication links, so fan-out is
    /// bounded. Default: 16.
    pub max_concurrent_fetches: usize,

    /// Maximum redirects followed per fetch.
    ///
    /// Default: 10.
    pub max_redirects: usize,

    /// User agent sent with every request.
    pub user_agent: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(10),
            scan_timeout: Duration::from_secs(30),
            max_concurrent_fetches: 16,
            max_redirects: 10,
            user_agent: concat!("post-discovery/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl DiscoveryConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load overrides from `DISCOVERY_*` environment variables.
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(secs) = parse_var::<u64>("DISCOVERY_FETCH_TIMEOUT_SECS")? {
            config.fetch_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_var::<u64>("DISCOVERY_SCAN_TIMEOUT_SECS")? {
            config.scan_timeout = Duration::from_secs(secs);
        }
        if let Some(n) = parse_var::<usize>("DISCOVERY_MAX_CONCURRENT_FETCHES")? {
            config = config.with_max_concurrent_fetches(n);
        }
        if let Some(n) = parse_var::<usize>("DISCOVERY_MAX_REDIRECTS")? {
            config.max_redirects = n;
        }
        if let Ok(user_agent) = env::var("DISCOVERY_USER_AGENT") {
            config.user_agent = user_agent;
        }

        Ok(config)
    }

    /// Set the per-fetch timeout.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Set the fallback scan ceiling.
    pub fn with_scan_timeout(mut self, timeout: Duration) -> Self {
        self.scan_timeout = timeout;
        self
    }

    /// Set the fallback scan concurrency (at least 1).
    pub fn with_max_concurrent_fetches(mut self, max: usize) -> Self {
        self.max_concurrent_fetches = max.max(1);
        self
    }

    /// Set the redirect limit.
    pub fn with_max_redirects(mut self, max: usize) -> Self {
        self.max_redirects = max;
        self
    }

    /// Set the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid {
                key: key.to_string(),
                value,
            }),
        Err(_) => Ok(None),
    }
}
