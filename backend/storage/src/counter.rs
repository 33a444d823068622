//! In-memory counter store.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use rsvp_core::{CounterStore, RsvpError};

/// Map size at which expired counters are swept on the next increment.
const SWEEP_THRESHOLD: usize = 1024;

struct Counter {
    count: u64,
    expires_at: Instant,
}

/// Counter store backed by a mutex-guarded map, honoring per-key expiry.
#[derive(Default)]
pub struct InMemoryCounterStore {
    counters: Mutex<HashMap<String, Counter>>,
}

impl InMemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tracked keys, expired ones included until the next sweep.
    pub async fn len(&self) -> usize {
        self.counters.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.counters.lock().await.is_empty()
    }

    /// Current value of a live counter (0 when absent or expired).
    pub async fn get(&self, key: &str) -> u64 {
        let counters = self.counters.lock().await;
        match counters.get(key) {
            Some(c) if c.expires_at > Instant::now() => c.count,
            _ => 0,
        }
    }

    /// Expiry instant of a live counter.
    pub async fn expires_at(&self, key: &str) -> Option<Instant> {
        let counters = self.counters.lock().await;
        counters
            .get(key)
            .filter(|c| c.expires_at > Instant::now())
            .map(|c| c.expires_at)
    }
}

#[async_trait]
impl CounterStore for InMemoryCounterStore {
    async fn increment(&self, key: &str, ttl: Duration) -> Result<u64, RsvpError> {
        let mut counters = self.counters.lock().await;
        let now = Instant::now();

        if counters.len() >= SWEEP_THRESHOLD {
            counters.retain(|_, c| c.expires_at > now);
        }

        let counter = counters.entry(key.to_string()).or_insert(Counter {
            count: 0,
            expires_at: now,
        });

        if counter.expires_at <= now {
            // Absent or expired: start a new window.
            counter.count = 1;
            counter.expires_at = now + ttl;
        } else {
            counter.count += 1;
        }

        debug!(key, count = counter.count, "Counter incremented");
        Ok(counter.count)
    }
}
