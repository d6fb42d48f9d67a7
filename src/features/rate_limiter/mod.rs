pub mod limiter;

pub use limiter::{DualWindowRateLimiter, RateLimit};
