pub mod entry;
pub mod metrics;
pub mod storage;

pub use entry::CachedResponse;
pub use metrics::CacheMetrics;
pub use storage::ResponseCache;
