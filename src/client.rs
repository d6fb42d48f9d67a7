//! The single choke point for every outbound Aha! API call.
//!
//! Glues together bearer auth, response caching, rate limiting, pagination
//! and error normalization. Each logical request runs at most once; there is
//! no retry layer here.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method};
use serde_json::Value;
use tracing::{debug, info};
use url::Url;

use crate::config::ClientConfig;
use crate::constants::api as api_constants;
use crate::errors::ApiError;
use crate::features::cache::{ResponseCache, cache_key};
use crate::features::rate_limiter::{DualWindowRateLimiter, RateLimit};
use crate::pagination;

/// Per-request options for [`ApiClient::request`].
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub params: Option<BTreeMap<String, String>>,
    pub body: Option<Value>,
    /// Whether a GET may be served from and stored into the cache. Ignored
    /// for mutations, which always bypass the cache.
    pub cacheable: bool,
    /// Freshness TTL for the cached response; the config default applies
    /// when unset.
    pub cache_ttl: Option<Duration>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            params: None,
            body: None,
            cacheable: true,
            cache_ttl: None,
        }
    }
}

/// Client for the Aha! REST API.
///
/// Clones are cheap on the inner pieces by design: the cache and limiter sit
/// behind `Arc` so every resource function in the process shares the same
/// global budgets and cached responses.
pub struct ApiClient {
    config: ClientConfig,
    http_client: Client,
    cache: Arc<ResponseCache<Arc<Value>>>,
    rate_limiter: Arc<dyn RateLimit>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Builds a client with its own cache and rate limiter, sized from the
    /// configuration.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let cache = Arc::new(ResponseCache::with_settings(
            config.default_cache_ttl,
            config.hard_expire_multiplier,
        ));
        let rate_limiter: Arc<dyn RateLimit> = Arc::new(DualWindowRateLimiter::with_budgets(
            config.burst_capacity,
            config.burst_window,
            config.sustained_capacity,
            config.sustained_window,
        ));
        Self::with_parts(config, cache, rate_limiter)
    }

    /// Builds a client over shared cache and limiter instances. Processes
    /// holding several clients against the same account should share one
    /// limiter so the budgets stay global.
    pub fn with_parts(
        config: ClientConfig,
        cache: Arc<ResponseCache<Arc<Value>>>,
        rate_limiter: Arc<dyn RateLimit>,
    ) -> Result<Self, ApiError> {
        let base = config.base_url();
        Url::parse(&base).map_err(|_| ApiError::InvalidDomain(config.domain.clone()))?;

        Ok(Self {
            config,
            http_client: Client::new(),
            cache,
            rate_limiter,
        })
    }

    /// Client configured from AHA_DOMAIN / AHA_API_TOKEN.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = ClientConfig::from_env()?;
        Ok(Self::new(config)?)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The shared response cache, for callers coordinating invalidation or
    /// wiring a second client over the same entries.
    pub fn cache(&self) -> Arc<ResponseCache<Arc<Value>>> {
        self.cache.clone()
    }

    /// The shared limiter, for callers throttling work outside the standard
    /// request path.
    pub fn rate_limiter(&self) -> Arc<dyn RateLimit> {
        self.rate_limiter.clone()
    }

    fn endpoint_url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url(), path)
    }

    /// Performs one logical API call.
    ///
    /// Cacheable GETs are answered from the cache when fresh - a hit skips
    /// both the rate limiter and the network. Everything else waits for a
    /// rate slot, runs the HTTP call with bearer auth and JSON headers, maps
    /// non-2xx statuses into [`ApiError::Api`], and parses the JSON body.
    /// Successful cacheable GETs populate the cache before returning.
    pub async fn request(&self, path: &str, options: RequestOptions) -> Result<Arc<Value>, ApiError> {
        let url = self.endpoint_url(path);
        let read_through = options.method == Method::GET && options.cacheable;
        let key = cache_key(&url, options.params.as_ref());

        if read_through {
            if let Some(value) = self.cache.get(&key) {
                debug!(key = %key, "cache HIT");
                return Ok(value);
            }
            debug!(key = %key, "cache MISS");
        }

        self.rate_limiter.acquire().await;

        let mut request = self
            .http_client
            .request(options.method.clone(), &url)
            .bearer_auth(&self.config.token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(reqwest::header::ACCEPT, "application/json");

        if let Some(params) = options.params.as_ref() {
            request = request.query(params);
        }
        if let Some(body) = options.body.as_ref() {
            request = request.json(body);
        }

        info!(method = %options.method, url = %url, "issuing API request");
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            // Body may be HTML or plain text; a failed read still yields an
            // error carrying the status.
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(
                status,
                body,
                api_constants::ERROR_BODY_MAX_LENGTH,
            ));
        }

        let parsed: Value = response.json().await?;
        let parsed = Arc::new(parsed);

        if read_through {
            let ttl = options.cache_ttl.unwrap_or(self.config.default_cache_ttl);
            self.cache.set_with_ttl(&key, parsed.clone(), ttl);
        }

        Ok(parsed)
    }

    /// Fetches every page of a collection endpoint and returns the
    /// concatenated items found under `array_key`.
    ///
    /// Each page rides through [`request`](Self::request) individually, so
    /// pages are cached and rate-limited one by one.
    pub async fn fetch_all_pages(
        &self,
        path: &str,
        array_key: &str,
        params: Option<BTreeMap<String, String>>,
    ) -> Result<Vec<Value>, ApiError> {
        let base_params = params.unwrap_or_default();

        pagination::fetch_all_pages(array_key, |page| {
            let mut page_params = base_params.clone();
            page_params.insert("per_page".to_string(), api_constants::PER_PAGE.to_string());
            page_params.insert("page".to_string(), page.to_string());

            self.request(
                path,
                RequestOptions {
                    params: Some(page_params),
                    ..Default::default()
                },
            )
        })
        .await
    }

    /// Drops every cached entry whose key contains `pattern`. Call after a
    /// successful mutation with each pattern the write could have staled.
    pub fn invalidate(&self, pattern: &str) -> usize {
        self.cache.invalidate(pattern)
    }
}
