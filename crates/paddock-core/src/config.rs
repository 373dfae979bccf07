//! Fetch configuration.
//!
//! # Environment Variables
//!
//! | Setting | Env Var | Default |
//! |---------|---------|---------|
//! | API base URL | `PADDOCK_BASE_URL` | `https://api.jolpi.ca/ergast/f1` |
//! | Per-request timeout | `PADDOCK_TIMEOUT_MS` | `5000` |
//! | Fan-out concurrency | `PADDOCK_MAX_CONCURRENCY` | `4` |
//! | Request rate | `PADDOCK_REQUESTS_PER_SECOND` | `4` |
//!
//! Unparseable values fall back to the default.

use std::env;
use std::str::FromStr;

pub const DEFAULT_BASE_URL: &str = "https://api.jolpi.ca/ergast/f1";

/// Settings shared by the adapter, the fetcher and the fan-out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    pub max_concurrency: usize,
    pub requests_per_second: u32,
    pub burst: u32,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: String::from(DEFAULT_BASE_URL),
            timeout_ms: 5_000,
            max_concurrency: 4,
            requests_per_second: 4,
            burst: 4,
        }
    }
}

impl FetchConfig {
    /// Defaults overlaid with any `PADDOCK_*` environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: env::var("PADDOCK_BASE_URL")
                .ok()
                .filter(|value| !value.trim().is_empty())
                .unwrap_or(defaults.base_url),
            timeout_ms: env_number("PADDOCK_TIMEOUT_MS").unwrap_or(defaults.timeout_ms),
            max_concurrency: env_number("PADDOCK_MAX_CONCURRENCY")
                .unwrap_or(defaults.max_concurrency),
            requests_per_second: env_number("PADDOCK_REQUESTS_PER_SECOND")
                .unwrap_or(defaults.requests_per_second),
            burst: defaults.burst,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Zero is treated as one; the fan-out always makes progress.
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    pub fn with_rate(mut self, requests_per_second: u32, burst: u32) -> Self {
        self.requests_per_second = requests_per_second;
        self.burst = burst;
        self
    }

    /// Base URL without a trailing slash.
    pub fn api_root(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

fn env_number<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|value| value.trim().parse().ok())
}
