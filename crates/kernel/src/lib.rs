//! Waymark Kernel Library
//!
//! Route title resolution and request rate limiting for the Waymark web
//! application. The HTTP layer consumes both independently: the resolver
//! to render page titles and breadcrumb trails, the limiter to throttle
//! clients by IP-derived key.

pub mod config;
pub mod limiter;
pub mod routing;

pub use config::Config;
pub use limiter::{RateLimitConfig, RateLimiter};
pub use routing::{PageTitle, TitleResolver};
