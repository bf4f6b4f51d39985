use hickory_proto::op::Message;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// One stored answer plus the bookkeeping eviction reads.
pub struct CachedResponse {
    pub message: Message,
    pub cost: usize,
    stored_at: Instant,
    ttl: Duration,
    hits: AtomicU64,
    /// Milliseconds since the cache epoch, updated on every hit.
    last_access_ms: AtomicU64,
}

impl CachedResponse {
    pub fn new(message: Message, ttl: Duration, cost: usize, age_ms: u64) -> Self {
        Self {
            message,
            cost,
            stored_at: Instant::now(),
            ttl,
            hits: AtomicU64::new(0),
            last_access_ms: AtomicU64::new(age_ms),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.stored_at.elapsed() >= self.ttl
    }

    pub fn record_hit(&self, age_ms: u64) {
        self.hits.fetch_add(1, Ordering::Relaxed);
        self.last_access_ms.store(age_ms, Ordering::Relaxed);
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn last_access_ms(&self) -> u64 {
        self.last_access_ms.load(Ordering::Relaxed)
    }
}
