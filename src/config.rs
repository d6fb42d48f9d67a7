use std::time::Duration;

use anyhow::Error;
use dotenvy::dotenv;

use crate::constants::{cache, rate_limiter};
use crate::utils::parse_duration;

/// Runtime configuration for the API client.
///
/// Everything is passed in explicitly at construction; there is no dynamic
/// or file-based override layer. `from_env` exists as a convenience for
/// binaries that keep the domain and token in the environment.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Aha! account subdomain, as in `https://{domain}.aha.io`.
    pub domain: String,
    /// API bearer token sent on every call.
    pub token: String,
    /// Full base URL override. When set it replaces the URL derived from
    /// `domain`; used for tests and self-hosted installs.
    pub base_url: Option<String>,
    /// Freshness TTL applied to cached GET responses by default.
    pub default_cache_ttl: Duration,
    /// Freshness TTL for identity lookups, which change far less often.
    pub identity_cache_ttl: Duration,
    /// Hard expiry is `multiplier x ttl` past insertion; stale reads are
    /// possible in between.
    pub hard_expire_multiplier: u32,
    pub burst_capacity: u32,
    pub burst_window: Duration,
    pub sustained_capacity: u32,
    pub sustained_window: Duration,
}

impl ClientConfig {
    pub fn new(domain: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            token: token.into(),
            base_url: None,
            default_cache_ttl: Duration::from_secs(cache::DEFAULT_TTL_SECONDS),
            identity_cache_ttl: Duration::from_secs(cache::IDENTITY_TTL_SECONDS),
            hard_expire_multiplier: cache::HARD_EXPIRE_MULTIPLIER,
            burst_capacity: rate_limiter::BURST_CAPACITY,
            burst_window: rate_limiter::BURST_WINDOW,
            sustained_capacity: rate_limiter::SUSTAINED_CAPACITY,
            sustained_window: rate_limiter::SUSTAINED_WINDOW,
        }
    }

    /// Loads the client configuration from the environment.
    ///
    /// Requires `AHA_DOMAIN` and `AHA_API_TOKEN`; honors an optional
    /// `AHA_CACHE_TTL` duration string ("30s", "5m", "1h").
    pub fn from_env() -> Result<Self, Error> {
        dotenv().ok();

        let domain = std::env::var("AHA_DOMAIN")
            .map_err(|_| anyhow::anyhow!("AHA_DOMAIN must be set"))?;
        let token = std::env::var("AHA_API_TOKEN")
            .map_err(|_| anyhow::anyhow!("AHA_API_TOKEN must be set"))?;

        let mut config = Self::new(domain, token);

        if let Ok(ttl) = std::env::var("AHA_CACHE_TTL") {
            config.default_cache_ttl = parse_duration(&ttl)
                .map_err(|e| anyhow::anyhow!("invalid AHA_CACHE_TTL: {e}"))?;
        }

        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_default_cache_ttl(mut self, ttl: Duration) -> Self {
        self.default_cache_ttl = ttl;
        self
    }

    pub fn with_rate_budgets(
        mut self,
        burst_capacity: u32,
        burst_window: Duration,
        sustained_capacity: u32,
        sustained_window: Duration,
    ) -> Self {
        self.burst_capacity = burst_capacity;
        self.burst_window = burst_window;
        self.sustained_capacity = sustained_capacity;
        self.sustained_window = sustained_window;
        self
    }

    /// The URL every request path is appended to.
    pub fn base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}.aha.io/api/v1", self.domain),
        }
    }
}
