//! Background sweep of lapsed rate-limit windows.
//!
//! Expiry is otherwise evaluated lazily on access, so keys from clients
//! that never return would accumulate until the store's capacity bound
//! kicks in. The sweep task reclaims them on an interval.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::limiter::fixed_window::RateLimiter;

/// Handle to a running sweep task.
#[derive(Debug)]
pub struct SweepHandle {
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SweepHandle {
    /// Signal the task to stop and wait for it to finish.
    pub async fn stop(self) {
        let _ = self.stop.send(true);
        let _ = self.task.await;
    }
}

/// Spawn a task that sweeps the limiter's store every `every`.
pub fn spawn_sweep(limiter: RateLimiter, every: Duration) -> SweepHandle {
    let (stop_tx, mut stop_rx) = watch::channel(false);

    let task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    limiter.sweep();
                }
                changed = stop_rx.changed() => {
                    // A dropped handle counts as a stop signal.
                    if changed.is_err() || *stop_rx.borrow() {
                        debug!("rate-limit sweep stopping");
                        break;
                    }
                }
            }
        }
    });

    SweepHandle {
        stop: stop_tx,
        task,
    }
}
