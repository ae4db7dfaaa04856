//! Counter storage for fixed-window rate limiting.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::debug;

/// Default bound on tracked client keys.
pub const DEFAULT_MAX_KEYS: usize = 100_000;

/// Storage backend for fixed-window counters.
///
/// The in-memory [`MemoryStore`] is the default; a store backed by an
/// external system can be substituted for multi-process deployments.
pub trait CounterStore: Send + Sync {
    /// Record a hit for `key` and return the post-increment count in the
    /// window containing `now`. A lapsed window is reset before counting.
    fn hit(&self, key: &str, now: Instant, window: Duration) -> u32;

    /// Current count for `key`, or zero if absent or lapsed.
    fn count(&self, key: &str, now: Instant, window: Duration) -> u32;

    /// Drop `key` entirely.
    fn remove(&self, key: &str);

    /// Drop all entries whose window has lapsed. Returns the number
    /// removed.
    fn sweep(&self, now: Instant, window: Duration) -> usize;
}

/// One fixed-window counter. The window lapses at
/// `window_start + window`.
#[derive(Debug, Clone, Copy)]
struct WindowEntry {
    count: u32,
    window_start: Instant,
}

impl WindowEntry {
    fn lapsed(&self, now: Instant, window: Duration) -> bool {
        now.duration_since(self.window_start) >= window
    }
}

/// In-process store: a mutex-guarded map of key to window entry.
///
/// The mutex serializes the read-increment-compare sequence; without it,
/// concurrent checks for one key could each observe a count below the
/// budget and all pass.
///
/// At most `max_keys` clients are tracked. When the bound is reached,
/// lapsed entries are dropped first, then the oldest window.
#[derive(Debug)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, WindowEntry>>,
    max_keys: usize,
}

impl MemoryStore {
    /// Create a store bounded to `max_keys` tracked clients.
    pub fn new(max_keys: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            max_keys,
        }
    }

    /// Number of currently tracked keys, lapsed or not.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Check if no keys are tracked.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    fn make_room(entries: &mut HashMap<String, WindowEntry>, now: Instant, window: Duration) {
        let before = entries.len();
        entries.retain(|_, entry| !entry.lapsed(now, window));
        if entries.len() < before {
            return;
        }

        // Nothing lapsed; drop the oldest window to stay within the bound.
        let oldest = entries
            .iter()
            .min_by_key(|(_, entry)| entry.window_start)
            .map(|(key, _)| key.clone());
        if let Some(key) = oldest {
            entries.remove(&key);
            debug!(key = %key, "rate limit store full, evicted oldest window");
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_KEYS)
    }
}

impl CounterStore for MemoryStore {
    fn hit(&self, key: &str, now: Instant, window: Duration) -> u32 {
        let mut entries = self.entries.lock();

        if let Some(entry) = entries.get_mut(key) {
            if entry.lapsed(now, window) {
                entry.count = 1;
                entry.window_start = now;
            } else {
                entry.count = entry.count.saturating_add(1);
            }
            return entry.count;
        }

        if entries.len() >= self.max_keys {
            Self::make_room(&mut entries, now, window);
        }
        entries.insert(
            key.to_string(),
            WindowEntry {
                count: 1,
                window_start: now,
            },
        );
        1
    }

    fn count(&self, key: &str, now: Instant, window: Duration) -> u32 {
        self.entries
            .lock()
            .get(key)
            .filter(|entry| !entry.lapsed(now, window))
            .map_or(0, |entry| entry.count)
    }

    fn remove(&self, key: &str) {
        self.entries.lock().remove(key);
    }

    fn sweep(&self, now: Instant, window: Duration) -> usize {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, entry| !entry.lapsed(now, window));
        before - entries.len()
    }
}
