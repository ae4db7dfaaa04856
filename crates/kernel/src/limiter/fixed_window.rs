//! Fixed-window request rate limiting.
//!
//! Counts hits per client key inside a fixed window and denies once the
//! point budget is exhausted. Expiry is evaluated lazily on access; see
//! the sweep task for reclaiming abandoned keys.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::limiter::clock::{Clock, SystemClock};
use crate::limiter::store::{CounterStore, MemoryStore};

/// Default point budget per window.
pub const DEFAULT_POINTS: u32 = 100;

/// Default window duration in seconds (15 minutes).
pub const DEFAULT_WINDOW_SECS: u64 = 900;

/// Rate limit configuration, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Hits allowed per key per window.
    pub points: u32,

    /// Window duration.
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            points: DEFAULT_POINTS,
            window: Duration::from_secs(DEFAULT_WINDOW_SECS),
        }
    }
}

/// Fixed-window rate limiter keyed by client identifier.
///
/// Construct once at process start and share by reference; the store
/// serializes concurrent checks for the same key.
#[derive(Clone)]
pub struct RateLimiter {
    store: Arc<dyn CounterStore>,
    clock: Arc<dyn Clock>,
    config: RateLimitConfig,
}

impl RateLimiter {
    /// Create a limiter with the in-memory store and system clock.
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_parts(config, Arc::new(MemoryStore::default()), Arc::new(SystemClock))
    }

    /// Create a limiter with explicit storage and clock.
    pub fn with_parts(
        config: RateLimitConfig,
        store: Arc<dyn CounterStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    /// Check whether a request from `key` is allowed.
    ///
    /// Returns true when allowed. Denied hits are still counted.
    pub fn check(&self, key: &str) -> bool {
        let count = self.store.hit(key, self.clock.now(), self.config.window);

        if count > self.config.points {
            debug!(
                key = %key,
                count = count,
                limit = self.config.points,
                "rate limit exceeded"
            );
            return false;
        }
        true
    }

    /// Current count for `key` in its active window (for monitoring).
    pub fn current(&self, key: &str) -> u32 {
        self.store.count(key, self.clock.now(), self.config.window)
    }

    /// Clear the counter for `key` (for testing).
    pub fn reset(&self, key: &str) {
        self.store.remove(key);
    }

    /// Drop all lapsed windows from the store. Returns the number
    /// removed.
    pub fn sweep(&self) -> usize {
        let removed = self.store.sweep(self.clock.now(), self.config.window);
        if removed > 0 {
            debug!(removed = removed, "swept lapsed rate-limit windows");
        }
        removed
    }

    /// The limiter's configuration.
    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("config", &self.config)
            .finish()
    }
}
