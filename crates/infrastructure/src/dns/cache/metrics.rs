use std::sync::atomic::AtomicU64;

/// Counters exposed for the status report and the sweep job's logs.
#[derive(Default)]
pub struct CacheMetrics {
    pub hits: AtomicU64,
    pub misses: AtomicU64,
    pub insertions: AtomicU64,
    pub evictions: AtomicU64,
    pub expired_removals: AtomicU64,
}
