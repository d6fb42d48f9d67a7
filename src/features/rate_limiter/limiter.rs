use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};
use tracing::debug;

use crate::constants::rate_limiter as rl_constants;

/// Shared throttle gating every outbound API call.
#[async_trait]
pub trait RateLimit: Send + Sync {
    /// Resolves once a slot is granted. Cannot fail; it can only be delayed.
    /// There is no timeout and no cancellation of a pending acquisition.
    async fn acquire(&self);
    /// Restores both budgets to full capacity and resets the refill clocks.
    /// Intended for test isolation, not production use.
    async fn reset(&self);
}

/// One refill window of the dual budget.
struct Window {
    capacity: u32,
    period: Duration,
    tokens: u32,
    last_refill: Instant,
}

impl Window {
    fn new(capacity: u32, period: Duration, now: Instant) -> Self {
        Self {
            capacity,
            period,
            tokens: capacity,
            last_refill: now,
        }
    }

    /// Lazily credits whole-window refills elapsed since `last_refill`,
    /// capped at capacity. The refill clock advances only by the whole
    /// windows consumed, so partial windows keep accruing.
    fn refill(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_refill);
        let cycles = (elapsed.as_nanos() / self.period.as_nanos()).min(u32::MAX as u128) as u32;
        if cycles > 0 {
            self.tokens = self
                .tokens
                .saturating_add(cycles.saturating_mul(self.capacity))
                .min(self.capacity);
            self.last_refill += self.period * cycles;
        }
    }

    /// Time until this window next gains tokens.
    fn next_refill_in(&self, now: Instant) -> Duration {
        (self.last_refill + self.period).saturating_duration_since(now)
    }
}

struct DualBudget {
    burst: Window,
    sustained: Window,
}

impl DualBudget {
    fn refill(&mut self, now: Instant) {
        self.burst.refill(now);
        self.sustained.refill(now);
    }

    /// Takes one token from each window, or none at all. Both counters must
    /// be positive for a grant.
    fn try_take(&mut self) -> bool {
        if self.burst.tokens > 0 && self.sustained.tokens > 0 {
            self.burst.tokens -= 1;
            self.sustained.tokens -= 1;
            true
        } else {
            false
        }
    }

    /// How long until a grant could next succeed. The slowest exhausted
    /// window gates the wait.
    fn time_until_replenish(&self, now: Instant) -> Duration {
        let mut wait = Duration::ZERO;
        if self.burst.tokens == 0 {
            wait = wait.max(self.burst.next_refill_in(now));
        }
        if self.sustained.tokens == 0 {
            wait = wait.max(self.sustained.next_refill_in(now));
        }
        wait
    }
}

/// Token bucket limiter enforcing the API's burst and sustained budgets
/// simultaneously.
///
/// Refills are computed on demand from elapsed time; nothing ticks while the
/// limiter is idle. Exhausted callers sleep until the gating window refills
/// and retry, queueing on the internal lock in roughly FIFO order - a single
/// refill can drain many waiters back to back, and a caller arriving just
/// after a refill may slip in ahead of a longer-waiting one. That matches
/// the fairness the API tolerates; strict ordering is not a goal.
pub struct DualWindowRateLimiter {
    budget: Mutex<DualBudget>,
}

impl DualWindowRateLimiter {
    /// Limiter with the stock Aha! budgets (20/s burst, 300/min sustained).
    pub fn new() -> Self {
        Self::with_budgets(
            rl_constants::BURST_CAPACITY,
            rl_constants::BURST_WINDOW,
            rl_constants::SUSTAINED_CAPACITY,
            rl_constants::SUSTAINED_WINDOW,
        )
    }

    pub fn with_budgets(
        burst_capacity: u32,
        burst_window: Duration,
        sustained_capacity: u32,
        sustained_window: Duration,
    ) -> Self {
        let now = Instant::now();
        Self {
            budget: Mutex::new(DualBudget {
                burst: Window::new(burst_capacity, burst_window, now),
                sustained: Window::new(sustained_capacity, sustained_window, now),
            }),
        }
    }
}

impl Default for DualWindowRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateLimit for DualWindowRateLimiter {
    async fn acquire(&self) {
        loop {
            let wait = {
                let mut budget = self.budget.lock().await;
                let now = Instant::now();
                budget.refill(now);
                if budget.try_take() {
                    return;
                }
                budget.time_until_replenish(now)
            };

            debug!(
                wait_ms = wait.as_millis() as u64,
                "rate budget exhausted, waiting for refill"
            );
            sleep(wait).await;
        }
    }

    async fn reset(&self) {
        let mut budget = self.budget.lock().await;
        let now = Instant::now();
        let (burst_cap, burst_period) = (budget.burst.capacity, budget.burst.period);
        let (sustained_cap, sustained_period) =
            (budget.sustained.capacity, budget.sustained.period);
        budget.burst = Window::new(burst_cap, burst_period, now);
        budget.sustained = Window::new(sustained_cap, sustained_period, now);
    }
}
