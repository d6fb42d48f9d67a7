//! Core subsystems of the access layer.
//!
//! - `rate_limiter` - Dual-window token bucket throttling outbound calls
//! - `cache` - Response cache with freshness TTL and hard expiry

pub mod cache;
pub mod rate_limiter;
