//! Dependency wiring: construct the concrete adapters once and hand the
//! shared pipeline to every listener.

use anyhow::Context;
use phantom_dns_application::ports::{BlockFilterEnginePort, ResponseCachePort, UpstreamResolver};
use phantom_dns_application::QueryPipeline;
use phantom_dns_domain::Config;
use phantom_dns_infrastructure::dns::{BlockFilterEngine, ForwardingResolver, ResponseCache};
use std::sync::Arc;
use std::time::Duration;

pub struct Services {
    pub block_filter: Arc<dyn BlockFilterEnginePort>,
    pub cache: Arc<dyn ResponseCachePort>,
    pub pipeline: Arc<QueryPipeline>,
}

impl Services {
    pub fn build(config: &Config) -> anyhow::Result<Self> {
        let block_filter: Arc<dyn BlockFilterEnginePort> = Arc::new(
            BlockFilterEngine::new(&config.blocking).context("failed to build block filter")?,
        );

        let cache: Arc<dyn ResponseCachePort> = Arc::new(ResponseCache::new(
            config.dns.cache_max_cost,
            Duration::from_secs(config.dns.cache_min_ttl_secs),
            Duration::from_secs(config.dns.cache_max_ttl_secs),
        ));

        let upstream: Arc<dyn UpstreamResolver> = Arc::new(ForwardingResolver::new(
            config.upstream_addr().context("invalid upstream address")?,
            Duration::from_millis(config.dns.query_timeout_ms),
        ));

        let pipeline = Arc::new(QueryPipeline::new(
            Arc::clone(&block_filter),
            Arc::clone(&cache),
            upstream,
        ));

        Ok(Self {
            block_filter,
            cache,
            pipeline,
        })
    }
}
