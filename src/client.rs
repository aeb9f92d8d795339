use reqwest::blocking::{Client, ClientBuilder};
use std::time::Duration;

use crate::error::Result;

/// Path of the Admin API relative to the site URL
pub const ADMIN_API_PATH: &str = "/ghost/api/admin";

/// Create the HTTP client for Admin API requests
/// with connection pooling and timeouts taken from `config`
pub fn create_rest_client(config: &Config) -> Result<Client> {
    let client = ClientBuilder::new()
        .pool_max_idle_per_host(config.pool_max_idle_per_host)
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .build()?;
    Ok(client)
}

/// Configuration for the Admin API client
#[derive(Clone)]
pub struct Config {
    /// Public site URL, e.g. `https://example.ghost.io`
    pub site_url: String,
    /// Admin API key in `id:secret` form
    pub api_key: String,
    /// Overall request timeout
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub pool_max_idle_per_host: usize,
}

impl Config {
    /// Create a new configuration for the given site and key
    pub fn new(site_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Config {
            site_url: site_url.into(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(300), // 5 minutes
            connect_timeout: Duration::from_secs(10),
            pool_max_idle_per_host: 50,
        }
    }

    /// Set the overall request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the connect timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the idle connection pool size per host
    pub fn with_pool_max_idle_per_host(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    /// Get the base URL for Admin API requests.
    ///
    /// At most one trailing slash is removed from the site URL.
    pub fn base_url(&self) -> String {
        base_url(&self.site_url)
    }
}

pub(crate) fn base_url(site_url: &str) -> String {
    let site = site_url.strip_suffix('/').unwrap_or(site_url);
    format!("{}{}", site, ADMIN_API_PATH)
}

// Implement Debug manually to avoid exposing the API key
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("site_url", &self.site_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("pool_max_idle_per_host", &self.pool_max_idle_per_host)
            .finish()
    }
}
