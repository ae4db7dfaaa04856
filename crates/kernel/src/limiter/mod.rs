//! Request rate limiting.
//!
//! Fixed-window counters keyed by a client identifier derived from
//! request headers. The limiter object owns its storage and clock and is
//! shared by reference; entries expire lazily on access, with an
//! optional background sweep to reclaim abandoned keys.

mod clock;
mod fixed_window;
mod http;
mod store;
mod sweep;

pub use clock::{Clock, SystemClock};
pub use fixed_window::{DEFAULT_POINTS, DEFAULT_WINDOW_SECS, RateLimitConfig, RateLimiter};
pub use http::{client_id, throttled_response};
pub use store::{CounterStore, DEFAULT_MAX_KEYS, MemoryStore};
pub use sweep::{SweepHandle, spawn_sweep};
