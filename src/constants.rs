// Application-wide constants

/// Rate limiter budgets
///
/// Aha! enforces 20 requests per second and 300 per minute per token; both
/// windows are tracked independently and a call must fit in both.
pub mod rate_limiter {
    use std::time::Duration;

    pub const BURST_CAPACITY: u32 = 20;
    pub const BURST_WINDOW: Duration = Duration::from_secs(1);
    pub const SUSTAINED_CAPACITY: u32 = 300;
    pub const SUSTAINED_WINDOW: Duration = Duration::from_secs(60);
}

/// Cache configuration
pub mod cache {
    pub const DEFAULT_TTL_SECONDS: u64 = 300; // 5 minutes
    pub const IDENTITY_TTL_SECONDS: u64 = 3600; // 1 hour, identity rarely changes
    pub const HARD_EXPIRE_MULTIPLIER: u32 = 5;
}

/// API conventions
pub mod api {
    pub const PER_PAGE: u32 = 200;
    pub const ERROR_BODY_MAX_LENGTH: usize = 512;
}

/// Time conversion helpers
pub mod time {
    pub const SECONDS_PER_MINUTE: u64 = 60;
    pub const SECONDS_PER_HOUR: u64 = 3600;
}
