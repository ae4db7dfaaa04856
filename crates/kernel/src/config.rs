//! Configuration loaded from environment variables.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::limiter::{
    MemoryStore, RateLimitConfig, RateLimiter, SweepHandle, SystemClock, spawn_sweep,
};
use crate::routing::{RouteTable, TitleResolver};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Rate-limit point budget per window (default: 100).
    pub rate_limit_points: u32,

    /// Rate-limit window in seconds (default: 900).
    pub rate_limit_window_secs: u64,

    /// Maximum tracked client keys before eviction (default: 100000).
    pub rate_limit_max_clients: usize,

    /// Sweep interval in seconds; 0 disables the sweep task (default: 300).
    pub rate_limit_sweep_secs: u64,

    /// Path segment that routes a request to the admin table (default: "admin").
    pub admin_marker: String,

    /// Path to the admin route table (default: ./routes/admin.json).
    pub admin_routes_path: PathBuf,

    /// Path to the app route table (default: ./routes/app.json).
    pub app_routes_path: PathBuf,

    /// Path to the nested route table (default: ./routes/nested.json).
    pub nested_routes_path: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let rate_limit_points = env::var("RATE_LIMIT_POINTS")
            .unwrap_or_else(|_| "100".to_string())
            .parse()
            .context("RATE_LIMIT_POINTS must be a valid u32")?;

        let rate_limit_window_secs = env::var("RATE_LIMIT_WINDOW_SECS")
            .unwrap_or_else(|_| "900".to_string())
            .parse()
            .context("RATE_LIMIT_WINDOW_SECS must be a valid u64")?;

        let rate_limit_max_clients = env::var("RATE_LIMIT_MAX_CLIENTS")
            .unwrap_or_else(|_| "100000".to_string())
            .parse()
            .context("RATE_LIMIT_MAX_CLIENTS must be a valid usize")?;

        let rate_limit_sweep_secs = env::var("RATE_LIMIT_SWEEP_SECS")
            .unwrap_or_else(|_| "300".to_string())
            .parse()
            .context("RATE_LIMIT_SWEEP_SECS must be a valid u64")?;

        let admin_marker = env::var("ADMIN_MARKER").unwrap_or_else(|_| "admin".to_string());

        let admin_routes_path = env::var("ADMIN_ROUTES_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./routes/admin.json"));

        let app_routes_path = env::var("APP_ROUTES_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./routes/app.json"));

        let nested_routes_path = env::var("NESTED_ROUTES_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./routes/nested.json"));

        Ok(Self {
            rate_limit_points,
            rate_limit_window_secs,
            rate_limit_max_clients,
            rate_limit_sweep_secs,
            admin_marker,
            admin_routes_path,
            app_routes_path,
            nested_routes_path,
        })
    }

    /// The rate-limit settings as limiter configuration.
    pub fn rate_limit(&self) -> RateLimitConfig {
        RateLimitConfig {
            points: self.rate_limit_points,
            window: Duration::from_secs(self.rate_limit_window_secs),
        }
    }

    /// Build the process-wide rate limiter from this configuration.
    pub fn rate_limiter(&self) -> RateLimiter {
        RateLimiter::with_parts(
            self.rate_limit(),
            Arc::new(MemoryStore::new(self.rate_limit_max_clients)),
            Arc::new(SystemClock),
        )
    }

    /// Spawn the background sweep task when enabled.
    ///
    /// Returns `None` when the sweep interval is 0.
    pub fn spawn_sweeper(&self, limiter: RateLimiter) -> Option<SweepHandle> {
        if self.rate_limit_sweep_secs == 0 {
            return None;
        }
        Some(spawn_sweep(
            limiter,
            Duration::from_secs(self.rate_limit_sweep_secs),
        ))
    }

    /// Load and compile the route tables named by this configuration.
    pub fn load_resolver(&self) -> Result<TitleResolver> {
        let admin = load_table(&self.admin_routes_path)?;
        let app = load_table(&self.app_routes_path)?;
        let nested = load_table(&self.nested_routes_path)?;

        Ok(TitleResolver::new(admin, app, nested).with_admin_marker(self.admin_marker.clone()))
    }
}

fn load_table(path: &Path) -> Result<RouteTable> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read route table {}", path.display()))?;

    RouteTable::from_json(&json)
        .with_context(|| format!("invalid route table {}", path.display()))
}
