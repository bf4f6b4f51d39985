use super::{CachedResponse, CacheMetrics};
use dashmap::DashMap;
use hickory_proto::op::Message;
use phantom_dns_application::ports::ResponseCachePort;
use phantom_dns_domain::CacheKey;
use rustc_hash::FxBuildHasher;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Shared in-memory response cache.
///
/// Reads go straight to the DashMap. Writes and removals serialize on the
/// `admission` mutex so the cost accounting stays exact: the sum of entry
/// costs never exceeds `max_cost`. The mutex is held only for in-memory
/// work, never across an upstream exchange.
pub struct ResponseCache {
    entries: DashMap<CacheKey, Arc<CachedResponse>, FxBuildHasher>,
    max_cost: usize,
    used_cost: AtomicUsize,
    min_ttl: Duration,
    max_ttl: Duration,
    admission: Mutex<()>,
    metrics: CacheMetrics,
    /// Reference point for entry access timestamps.
    epoch: Instant,
}

impl ResponseCache {
    pub fn new(max_cost: usize, min_ttl: Duration, max_ttl: Duration) -> Self {
        info!(
            max_cost = max_cost,
            min_ttl_secs = min_ttl.as_secs(),
            max_ttl_secs = max_ttl.as_secs(),
            "Initializing response cache"
        );
        Self {
            entries: DashMap::with_hasher(FxBuildHasher),
            max_cost,
            used_cost: AtomicUsize::new(0),
            min_ttl,
            max_ttl,
            admission: Mutex::new(()),
            metrics: CacheMetrics::default(),
            epoch: Instant::now(),
        }
    }

    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    pub fn used_cost(&self) -> usize {
        self.used_cost.load(Ordering::Relaxed)
    }

    fn age_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }

    /// Entry lifetime: the smallest record TTL in the answer, clamped to the
    /// configured floor and ceiling. Answers without records (NODATA) still
    /// get the floor, so repeated misses don't hammer the upstream.
    fn effective_ttl(&self, response: &Message) -> Duration {
        let record_ttl = response
            .answers()
            .iter()
            .chain(response.name_servers())
            .map(|r| u64::from(r.ttl()))
            .min();

        match record_ttl {
            Some(secs) => Duration::from_secs(secs)
                .clamp(self.min_ttl, self.max_ttl),
            None => self.min_ttl,
        }
    }

    /// Remove one entry and settle its cost. Caller holds `admission`.
    fn remove_entry(&self, key: &CacheKey) -> Option<Arc<CachedResponse>> {
        let (_, removed) = self.entries.remove(key)?;
        self.used_cost.fetch_sub(removed.cost, Ordering::Relaxed);
        Some(removed)
    }

    /// Pick the entry with the fewest hits, oldest access breaking ties.
    /// Caller holds `admission`.
    fn evict_one(&self) -> bool {
        let victim = self
            .entries
            .iter()
            .map(|entry| {
                (
                    entry.value().hits(),
                    entry.value().last_access_ms(),
                    entry.key().clone(),
                )
            })
            .min_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));

        let Some((_, _, key)) = victim else {
            return false;
        };

        if self.remove_entry(&key).is_some() {
            self.metrics.evictions.fetch_add(1, Ordering::Relaxed);
            debug!(domain = %key.domain, "Evicted cache entry");
            true
        } else {
            false
        }
    }
}

impl ResponseCachePort for ResponseCache {
    fn get(&self, key: &CacheKey) -> Option<Message> {
        let entry = match self.entries.get(key) {
            Some(entry) => Arc::clone(entry.value()),
            None => {
                self.metrics.misses.fetch_add(1, Ordering::Relaxed);
                return None;
            }
        };

        if entry.is_expired() {
            let _guard = self.admission.lock().unwrap_or_else(|e| e.into_inner());
            // Another thread may have already replaced the key.
            if let Some(current) = self.entries.get(key) {
                if current.value().is_expired() {
                    drop(current);
                    self.remove_entry(key);
                    self.metrics
                        .expired_removals
                        .fetch_add(1, Ordering::Relaxed);
                }
            }
            self.metrics.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        }

        entry.record_hit(self.age_ms());
        self.metrics.hits.fetch_add(1, Ordering::Relaxed);
        Some(entry.message.clone())
    }

    fn put(&self, key: CacheKey, response: &Message, cost_hint: usize) {
        let cost = cost_hint.max(1);
        if cost > self.max_cost {
            return;
        }

        let ttl = self.effective_ttl(response);
        let _guard = self.admission.lock().unwrap_or_else(|e| e.into_inner());

        // Replacing a key settles the old entry's cost first.
        self.remove_entry(&key);

        while self.used_cost.load(Ordering::Relaxed) + cost > self.max_cost {
            if !self.evict_one() {
                break;
            }
        }

        debug!(
            domain = %key.domain,
            record_type = %key.record_type,
            ttl_secs = ttl.as_secs(),
            "Caching response"
        );

        self.entries.insert(
            key,
            Arc::new(CachedResponse::new(
                response.clone(),
                ttl,
                cost,
                self.age_ms(),
            )),
        );
        self.used_cost.fetch_add(cost, Ordering::Relaxed);
        self.metrics.insertions.fetch_add(1, Ordering::Relaxed);
    }

    fn purge_expired(&self) -> usize {
        let expired: Vec<CacheKey> = self
            .entries
            .iter()
            .filter(|entry| entry.value().is_expired())
            .map(|entry| entry.key().clone())
            .collect();

        if expired.is_empty() {
            return 0;
        }

        let _guard = self.admission.lock().unwrap_or_else(|e| e.into_inner());
        let mut removed = 0;
        for key in expired {
            let still_expired = self
                .entries
                .get(&key)
                .map(|e| e.value().is_expired())
                .unwrap_or(false);
            if still_expired && self.remove_entry(&key).is_some() {
                removed += 1;
            }
        }

        self.metrics
            .expired_removals
            .fetch_add(removed as u64, Ordering::Relaxed);
        removed
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
