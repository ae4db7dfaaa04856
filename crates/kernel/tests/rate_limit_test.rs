#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Integration tests for request rate limiting.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use axum::http::HeaderMap;
use waymark_kernel::Config;
use waymark_kernel::limiter::{
    MemoryStore, RateLimitConfig, RateLimiter, SystemClock, client_id, spawn_sweep,
};

fn limiter(points: u32, window: Duration) -> RateLimiter {
    RateLimiter::new(RateLimitConfig { points, window })
}

#[test]
fn test_budget_exhaustion_and_window_reset() {
    let limiter = limiter(3, Duration::from_millis(50));

    assert!(limiter.check("1.2.3.4"));
    assert!(limiter.check("1.2.3.4"));
    assert!(limiter.check("1.2.3.4"));
    assert!(!limiter.check("1.2.3.4"));

    // A fresh window opens once the old one lapses.
    std::thread::sleep(Duration::from_millis(60));
    assert!(limiter.check("1.2.3.4"));
}

#[test]
fn test_concurrent_checks_never_exceed_budget() {
    let limiter = limiter(20, Duration::from_secs(60));
    let allowed = Arc::new(AtomicU32::new(0));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let limiter = limiter.clone();
            let allowed = allowed.clone();
            std::thread::spawn(move || {
                for _ in 0..10 {
                    if limiter.check("shared") {
                        allowed.fetch_add(1, Ordering::SeqCst);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(allowed.load(Ordering::SeqCst), 20);
}

#[test]
fn test_unknown_clients_share_one_bucket() {
    let limiter = limiter(2, Duration::from_secs(60));

    // No identifying headers, no connection address.
    assert_eq!(client_id(None, &HeaderMap::new()), "unknown");

    assert!(limiter.check(&client_id(None, &HeaderMap::new())));
    assert!(limiter.check(&client_id(None, &HeaderMap::new())));
    assert!(!limiter.check(&client_id(None, &HeaderMap::new())));
}

#[test]
fn test_header_derived_keys_bucket_independently() {
    let limiter = limiter(1, Duration::from_secs(60));

    let mut first = HeaderMap::new();
    first.insert("x-forwarded-for", "10.0.0.1".parse().unwrap());
    let mut second = HeaderMap::new();
    second.insert("x-real-ip", "10.0.0.2".parse().unwrap());

    assert!(limiter.check(&client_id(None, &first)));
    assert!(!limiter.check(&client_id(None, &first)));

    assert!(limiter.check(&client_id(None, &second)));
}

#[test]
fn test_limiter_built_from_config() {
    let config = Config {
        rate_limit_points: 2,
        rate_limit_window_secs: 900,
        rate_limit_max_clients: 1000,
        rate_limit_sweep_secs: 0,
        admin_marker: "admin".to_string(),
        admin_routes_path: "unused".into(),
        app_routes_path: "unused".into(),
        nested_routes_path: "unused".into(),
    };

    let limiter = config.rate_limiter();
    assert_eq!(limiter.config().points, 2);
    assert_eq!(limiter.config().window, Duration::from_secs(900));

    assert!(limiter.check("k"));
    assert!(limiter.check("k"));
    assert!(!limiter.check("k"));

    // Sweep interval 0 disables the background task.
    assert!(config.spawn_sweeper(limiter).is_none());
}

#[tokio::test]
async fn test_sweep_task_reclaims_abandoned_keys() {
    let store = Arc::new(MemoryStore::default());
    let limiter = RateLimiter::with_parts(
        RateLimitConfig {
            points: 5,
            window: Duration::from_millis(20),
        },
        store.clone(),
        Arc::new(SystemClock),
    );

    limiter.check("a");
    limiter.check("b");
    assert_eq!(store.len(), 2);

    let sweeper = spawn_sweep(limiter, Duration::from_millis(25));
    tokio::time::sleep(Duration::from_millis(80)).await;
    sweeper.stop().await;

    assert!(store.is_empty());
}
