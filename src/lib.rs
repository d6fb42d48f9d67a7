//! # Aha! API Client
//!
//! An async access layer for the Aha! REST API, featuring:
//! - Dual-window token bucket rate limiting (burst and sustained budgets)
//! - Response caching with freshness TTL and a hard-expiry ceiling
//! - Transparent aggregation of paginated collections
//! - Cache invalidation hooks for mutations
//! - Bearer-token authentication on every call
//!
//! All outbound traffic funnels through [`ApiClient::request`]; resource
//! modules under [`resources`] are thin typed wrappers over that surface.

pub mod client;
pub mod config;
pub mod constants;
pub mod errors;
pub mod features;
pub mod pagination;
pub mod resources;
pub mod utils;

pub use client::{ApiClient, RequestOptions};
pub use config::ClientConfig;
pub use errors::ApiError;
pub use features::cache::{ResponseCache, StaleValue, cache_key};
pub use features::rate_limiter::{DualWindowRateLimiter, RateLimit};
