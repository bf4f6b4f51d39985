use serde::{Deserialize, Serialize};

/// Upstream resolution and cache tuning.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DnsConfig {
    /// Upstream DNS server as `host:port`. All cache misses forward here.
    #[serde(default = "default_upstream")]
    pub upstream: String,

    /// Per-exchange upstream timeout in milliseconds. Zero is rejected at
    /// validation: an unbounded upstream wait is a defect, not a choice.
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,

    /// Maximum total cost admitted to the response cache.
    #[serde(default = "default_cache_max_cost")]
    pub cache_max_cost: usize,

    /// Floor applied to effective entry TTLs, in seconds.
    #[serde(default = "default_cache_min_ttl_secs")]
    pub cache_min_ttl_secs: u64,

    /// Ceiling applied to effective entry TTLs, in seconds.
    #[serde(default = "default_cache_max_ttl_secs")]
    pub cache_max_ttl_secs: u64,

    /// Interval between background sweeps of expired entries, in seconds.
    #[serde(default = "default_cache_sweep_interval_secs")]
    pub cache_sweep_interval_secs: u64,
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            upstream: default_upstream(),
            query_timeout_ms: default_query_timeout_ms(),
            cache_max_cost: default_cache_max_cost(),
            cache_min_ttl_secs: default_cache_min_ttl_secs(),
            cache_max_ttl_secs: default_cache_max_ttl_secs(),
            cache_sweep_interval_secs: default_cache_sweep_interval_secs(),
        }
    }
}

fn default_upstream() -> String {
    "1.1.1.1:53".to_string()
}

fn default_query_timeout_ms() -> u64 {
    2000
}

fn default_cache_max_cost() -> usize {
    100_000
}

fn default_cache_min_ttl_secs() -> u64 {
    10
}

fn default_cache_max_ttl_secs() -> u64 {
    86_400
}

fn default_cache_sweep_interval_secs() -> u64 {
    300
}
